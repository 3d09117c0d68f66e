//! Pure Moltbook REST API client.
//!
//! A minimal client for the Moltbook social API. Supports reading post feeds
//! and resolving agent profiles. No indexing logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use moltbook_client::{MoltbookClient, PostQuery};
//!
//! let client = MoltbookClient::from_env()?;
//!
//! let posts = client.fetch_posts(&PostQuery::submolt("introductions", 100)).await?;
//! for post in &posts {
//!     println!("{}", post.author_name().unwrap_or("(anonymous)"));
//! }
//!
//! let profile = client.fetch_agent_profile("some-agent").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{MoltbookError, Result};
pub use types::{AgentProfile, Post, PostAuthor, PostFeed, PostQuery, ProfileOwner};

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const BASE_URL: &str = "https://www.moltbook.com/api/v1";

/// Pure Moltbook API client.
#[derive(Clone)]
pub struct MoltbookClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl MoltbookClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from `MOLTBOOK_API_KEY`, honouring `MOLTBOOK_API_BASE` if set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MOLTBOOK_API_KEY")
            .map_err(|_| MoltbookError::Config("MOLTBOOK_API_KEY not set".into()))?;
        let client = Self::new(api_key);
        Ok(match std::env::var("MOLTBOOK_API_BASE") {
            Ok(base) if !base.is_empty() => client.with_base_url(base),
            _ => client,
        })
    }

    /// Set a custom base URL (for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set a custom HTTP client (timeouts, user agent).
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of posts.
    pub async fn fetch_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let body = self.get_json(&query.to_path()).await?;
        let posts = types::parse_posts(body)?;
        debug!(count = posts.len(), feed = ?query.feed, "Fetched posts");
        Ok(posts)
    }

    /// Fetch the profile of a single agent by name.
    pub async fn fetch_agent_profile(&self, name: &str) -> Result<AgentProfile> {
        let path = format!("/agents/profile?name={}", urlencoding::encode(name));
        let body = self.get_json(&path).await?;
        types::parse_profile(body)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Moltbook request");

        let resp = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MoltbookError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| MoltbookError::Parse(e.to_string()))
    }
}
