//! Testing utilities including a mock collaborator API.
//!
//! Useful for exercising the indexing pipeline without network calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moltbook_client::{AgentProfile, MoltbookError, Post, PostAuthor, PostFeed, PostQuery};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::ApiResult;
use crate::traits::api::AgentApi;

/// A mock collaborator API.
///
/// Feeds and profiles are canned; names registered as failing return a 500.
/// Unknown profiles return a 404, unknown feeds are empty.
#[derive(Default, Clone)]
pub struct MockApi {
    feeds: Arc<RwLock<HashMap<PostFeed, Vec<Post>>>>,
    failing_feeds: Arc<RwLock<HashSet<PostFeed>>>,
    profiles: Arc<RwLock<HashMap<String, AgentProfile>>>,
    failing_profiles: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<MockApiCall>>>,
}

/// Record of a call made to the mock API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockApiCall {
    Posts { feed: PostFeed, limit: u32 },
    Profile { name: String },
}

impl MockApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the posts returned for a feed.
    pub fn with_feed(self, feed: PostFeed, posts: Vec<Post>) -> Self {
        self.feeds.write().unwrap().insert(feed, posts);
        self
    }

    /// Make a feed fail with a 500.
    pub fn with_failing_feed(self, feed: PostFeed) -> Self {
        self.failing_feeds.write().unwrap().insert(feed);
        self
    }

    /// Add a profile, keyed by the name it is requested under.
    pub fn with_profile(self, name: impl Into<String>, profile: AgentProfile) -> Self {
        self.profiles.write().unwrap().insert(name.into(), profile);
        self
    }

    /// Make a profile lookup fail with a 500.
    pub fn with_failing_profile(self, name: impl Into<String>) -> Self {
        self.failing_profiles.write().unwrap().insert(name.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockApiCall> {
        self.calls.read().unwrap().clone()
    }

    /// Names whose profiles were requested, in call order.
    pub fn profile_requests(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockApiCall::Profile { name } => Some(name),
                MockApiCall::Posts { .. } => None,
            })
            .collect()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl AgentApi for MockApi {
    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>> {
        self.calls.write().unwrap().push(MockApiCall::Posts {
            feed: query.feed.clone(),
            limit: query.limit,
        });

        if self.failing_feeds.read().unwrap().contains(&query.feed) {
            return Err(server_error("feed unavailable"));
        }

        Ok(self
            .feeds
            .read()
            .unwrap()
            .get(&query.feed)
            .map(|posts| posts.iter().take(query.limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_agent_profile(&self, name: &str) -> ApiResult<AgentProfile> {
        self.calls.write().unwrap().push(MockApiCall::Profile {
            name: name.to_string(),
        });

        if self.failing_profiles.read().unwrap().contains(name) {
            return Err(server_error("profile unavailable"));
        }

        self.profiles
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| MoltbookError::Api {
                status: 404,
                message: format!("agent {} not found", name),
            })
    }
}

fn server_error(message: &str) -> MoltbookError {
    MoltbookError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Build a post by `author`, optionally timestamped.
pub fn post_by(author: &str, created_at: Option<DateTime<Utc>>) -> Post {
    Post {
        author: Some(PostAuthor {
            name: Some(author.to_string()),
        }),
        created_at,
    }
}

/// Build a minimal profile with a name and karma.
pub fn profile(name: &str, karma: i64) -> AgentProfile {
    AgentProfile {
        name: Some(name.to_string()),
        karma: Some(karma),
        ..Default::default()
    }
}
