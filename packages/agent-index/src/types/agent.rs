//! Agent record as persisted in the snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PROFILE_BASE_URL: &str = "https://www.moltbook.com/agent";
const TWITTER_BASE_URL: &str = "https://twitter.com";

/// One agent in the snapshot. `name` is the unique key.
///
/// Field order is the persisted key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    pub name: String,
    #[serde(default)]
    pub karma: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub follower_count: i64,
    #[serde(default)]
    pub following_count: i64,
    #[serde(default)]
    pub posts_count: i64,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub x_handle: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_avatar_url: Option<String>,
    pub moltbook_url: String,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
}

impl AgentRecord {
    /// Minimal record with every optional field defaulted.
    pub fn new(name: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            moltbook_url: profile_url(&name),
            name,
            karma: 0,
            description: String::new(),
            follower_count: 0,
            following_count: 0,
            posts_count: 0,
            comments_count: 0,
            x_handle: None,
            owner_name: None,
            owner_avatar_url: None,
            twitter_url: None,
            avatar_url: None,
            is_active: false,
            is_claimed: false,
            last_active: None,
            fetched_at,
        }
    }

    /// Set karma.
    pub fn with_karma(mut self, karma: i64) -> Self {
        self.karma = karma;
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Canonical Moltbook profile URL for an agent name.
pub fn profile_url(name: &str) -> String {
    format!("{}/{}", PROFILE_BASE_URL, urlencoding::encode(name))
}

/// Twitter/X profile URL for a handle.
pub fn twitter_url(handle: &str) -> String {
    format!("{}/{}", TWITTER_BASE_URL, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_is_encoded() {
        assert_eq!(profile_url("alpha"), "https://www.moltbook.com/agent/alpha");
        assert_eq!(
            profile_url("two words"),
            "https://www.moltbook.com/agent/two%20words"
        );
    }

    #[test]
    fn test_key_order() {
        let record = AgentRecord::new("alpha", Utc::now()).with_karma(5);
        let json = serde_json::to_string(&record).unwrap();

        let keys = [
            "\"name\"",
            "\"karma\"",
            "\"description\"",
            "\"followerCount\"",
            "\"followingCount\"",
            "\"postsCount\"",
            "\"commentsCount\"",
            "\"xHandle\"",
            "\"ownerName\"",
            "\"ownerAvatarUrl\"",
            "\"moltbookUrl\"",
            "\"twitterUrl\"",
            "\"avatarUrl\"",
            "\"isActive\"",
            "\"isClaimed\"",
            "\"lastActive\"",
            "\"fetchedAt\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }
}
