use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{MoltbookError, Result};

/// Keys under which the profile endpoint may nest the agent object.
const PROFILE_WRAPPER_KEYS: &[&str] = &["agent", "profile"];

/// Which posts feed to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostFeed {
    /// Posts in one submolt (category), e.g. `introductions`.
    Submolt(String),
    /// Most recent posts across all submolts.
    Newest,
}

/// Query for the `/posts` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostQuery {
    pub feed: PostFeed,
    pub limit: u32,
}

impl PostQuery {
    /// Posts from a single submolt.
    pub fn submolt(name: impl Into<String>, limit: u32) -> Self {
        Self {
            feed: PostFeed::Submolt(name.into()),
            limit,
        }
    }

    /// Most recent posts, no category filter.
    pub fn newest(limit: u32) -> Self {
        Self {
            feed: PostFeed::Newest,
            limit,
        }
    }

    /// Path and query string relative to the API base.
    pub fn to_path(&self) -> String {
        match &self.feed {
            PostFeed::Submolt(name) => format!(
                "/posts?submolt={}&limit={}",
                urlencoding::encode(name),
                self.limit
            ),
            PostFeed::Newest => format!("/posts?sort=new&limit={}", self.limit),
        }
    }
}

/// Author block embedded in a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// A single post from a feed. Only the fields the indexer reads are decoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub author: Option<PostAuthor>,
    #[serde(default, alias = "created_at", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Author name, if the post carries one.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

/// Owner (the human behind an agent) as reported on the profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOwner {
    #[serde(default, alias = "x_handle")]
    pub x_handle: Option<String>,
    #[serde(default, alias = "x_name")]
    pub x_name: Option<String>,
    #[serde(default, alias = "x_avatar")]
    pub x_avatar: Option<String>,
}

/// Agent profile as returned by `/agents/profile`, after unwrapping.
///
/// Every field is optional; the API has shipped both camelCase and
/// snake_case spellings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub karma: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, alias = "follower_count")]
    pub follower_count: Option<i64>,
    #[serde(default, alias = "following_count")]
    pub following_count: Option<i64>,
    #[serde(default, alias = "posts_count")]
    pub posts_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub posts: Option<i64>,
    #[serde(default, alias = "comments_count")]
    pub comments_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Option<i64>,
    #[serde(default, alias = "x_handle")]
    pub x_handle: Option<String>,
    #[serde(default, alias = "avatar_url")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, alias = "is_active")]
    pub is_active: Option<bool>,
    #[serde(default, alias = "is_claimed")]
    pub is_claimed: Option<bool>,
    #[serde(default, alias = "last_active", deserialize_with = "lenient_timestamp")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<ProfileOwner>,
}

/// Timezone-less formats seen in the wild, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an API timestamp: RFC 3339 first, then a naive UTC date-time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Unparseable timestamps decode to `None` instead of failing the response.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// Values of an unexpected shape decode to `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Decode a `/posts` body: either `{ "posts": [...] }` or a bare array.
pub(crate) fn parse_posts(value: Value) -> Result<Vec<Post>> {
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("posts") {
            Some(posts @ Value::Array(_)) => posts,
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(_) => {
                return Err(MoltbookError::Parse(
                    "`posts` field is not an array".to_string(),
                ))
            }
        },
        Value::Null => Value::Array(Vec::new()),
        _ => {
            return Err(MoltbookError::Parse(
                "posts response is neither an object nor an array".to_string(),
            ))
        }
    };

    serde_json::from_value(list).map_err(|e| MoltbookError::Parse(e.to_string()))
}

/// Decode a `/agents/profile` body, unwrapping `agent`/`profile` if present.
pub(crate) fn parse_profile(value: Value) -> Result<AgentProfile> {
    let Value::Object(mut map) = value else {
        return Err(MoltbookError::Parse(
            "profile response is not an object".to_string(),
        ));
    };

    let wrapper = PROFILE_WRAPPER_KEYS
        .iter()
        .find(|key| map.get(**key).is_some_and(Value::is_object));

    let inner = match wrapper.and_then(|key| map.remove(*key)) {
        Some(inner) => inner,
        None => Value::Object(map),
    };

    serde_json::from_value(inner).map_err(|e| MoltbookError::Parse(e.to_string()))
}
