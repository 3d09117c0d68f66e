//! Collaborator API trait.
//!
//! The indexer only needs two calls from the social platform: a page of posts
//! and a single agent profile. Keeping them behind a trait lets the pipeline
//! run against [`MoltbookClient`], a rate-limited wrapper, or a mock.

use async_trait::async_trait;
use moltbook_client::{AgentProfile, MoltbookClient, Post, PostQuery};

use crate::error::ApiResult;

/// Source of posts and agent profiles.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Fetch one page of posts.
    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>>;

    /// Fetch a single agent profile by name.
    async fn fetch_agent_profile(&self, name: &str) -> ApiResult<AgentProfile>;
}

#[async_trait]
impl AgentApi for MoltbookClient {
    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>> {
        MoltbookClient::fetch_posts(self, query).await
    }

    async fn fetch_agent_profile(&self, name: &str) -> ApiResult<AgentProfile> {
        MoltbookClient::fetch_agent_profile(self, name).await
    }
}
