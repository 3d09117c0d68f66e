use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{IndexError, Result};

/// Submolt whose posts are treated as agent introductions.
pub const INTRODUCTIONS_SUBMOLT: &str = "introductions";

/// Indexer configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// Where the snapshot document lives
    pub output_path: PathBuf,
    /// Minimum spacing between collaborator requests
    pub request_interval: Duration,
    /// A full index older than this forces a full pass
    pub full_index_max_age_hours: f64,
    /// How many top agents by karma an incremental pass always refreshes
    pub top_refresh: usize,
    /// Page size for both post feeds
    pub page_size: u32,
    /// Submolt scanned for introductions
    pub introductions_submolt: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("data/agents.json"),
            request_interval: Duration::from_millis(1000),
            full_index_max_age_hours: 24.0,
            top_refresh: 50,
            page_size: 100,
            introductions_submolt: INTRODUCTIONS_SUBMOLT.to_string(),
        }
    }
}

impl IndexConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        Ok(Self {
            output_path: env::var("AGENT_INDEX_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            request_interval: parse_var("AGENT_INDEX_REQUEST_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_interval),
            full_index_max_age_hours: parse_var("AGENT_INDEX_FULL_MAX_AGE_HOURS")?
                .unwrap_or(defaults.full_index_max_age_hours),
            top_refresh: parse_var("AGENT_INDEX_TOP_REFRESH")?.unwrap_or(defaults.top_refresh),
            page_size: parse_var("AGENT_INDEX_PAGE_SIZE")?.unwrap_or(defaults.page_size),
            introductions_submolt: defaults.introductions_submolt,
        })
    }

    /// Override the snapshot path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Override the request interval.
    pub fn with_request_interval(mut self, interval: Duration) -> Self {
        self.request_interval = interval;
        self
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| IndexError::Config(format!("{} must be a valid number, got {:?}", key, raw))),
        _ => Ok(None),
    }
}
