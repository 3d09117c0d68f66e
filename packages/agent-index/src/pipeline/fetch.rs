//! Profile fetching and normalisation.

use chrono::{DateTime, Utc};
use moltbook_client::AgentProfile;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::traits::api::AgentApi;
use crate::types::{profile_url, twitter_url, AgentRecord};

/// Result of fetching a batch of profiles.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Records for every name that resolved
    pub records: Vec<AgentRecord>,

    /// Names whose fetch failed
    pub failed: Vec<String>,
}

/// Fetch one agent and normalise it into a record.
pub async fn fetch_agent_record<A: AgentApi>(api: &A, name: &str) -> ApiResult<AgentRecord> {
    let profile = api.fetch_agent_profile(name).await?;
    Ok(normalize_profile(name, profile, Utc::now()))
}

/// Fetch every name in order. Failures are logged and skipped.
pub async fn fetch_all<'n, A, I>(api: &A, names: I) -> FetchOutcome
where
    A: AgentApi,
    I: IntoIterator<Item = &'n String>,
    I::IntoIter: ExactSizeIterator,
{
    let names = names.into_iter();
    let total = names.len();
    let mut outcome = FetchOutcome::default();

    for (i, name) in names.enumerate() {
        info!("[{}/{}] Fetching profile for {}", i + 1, total, name);

        match fetch_agent_record(api, name).await {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                warn!(name = %name, error = %e, "Failed to fetch agent profile");
                outcome.failed.push(name.clone());
            }
        }
    }

    outcome
}

/// Map a raw profile onto the canonical record shape.
///
/// `requested` is the name the profile was looked up by; it stands in when
/// the profile carries no name of its own.
pub fn normalize_profile(
    requested: &str,
    profile: AgentProfile,
    fetched_at: DateTime<Utc>,
) -> AgentRecord {
    let owner = profile.owner.unwrap_or_default();
    let owner_handle = non_empty(owner.x_handle);

    let name = non_empty(profile.name).unwrap_or_else(|| requested.to_string());

    AgentRecord {
        moltbook_url: profile_url(&name),
        name,
        karma: profile.karma.unwrap_or(0),
        description: non_empty(profile.description)
            .or_else(|| non_empty(profile.bio))
            .unwrap_or_default(),
        follower_count: profile.follower_count.unwrap_or(0),
        following_count: profile.following_count.unwrap_or(0),
        posts_count: profile.posts_count.or(profile.posts).unwrap_or(0),
        comments_count: profile.comments_count.or(profile.comments).unwrap_or(0),
        twitter_url: owner_handle.as_deref().map(twitter_url),
        x_handle: owner_handle.or_else(|| non_empty(profile.x_handle)),
        owner_name: non_empty(owner.x_name),
        owner_avatar_url: non_empty(owner.x_avatar),
        avatar_url: non_empty(profile.avatar_url).or_else(|| non_empty(profile.avatar)),
        is_active: profile.is_active.unwrap_or(false),
        is_claimed: profile.is_claimed.unwrap_or(false),
        last_active: profile.last_active,
        fetched_at,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
