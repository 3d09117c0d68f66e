//! Typed errors for the agent indexer.
//!
//! Uses `thiserror` for library errors (not `anyhow`); the binary wraps
//! these with context.

use std::path::PathBuf;

use moltbook_client::MoltbookError;
use thiserror::Error;

/// Errors that can occur while indexing agents.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Collaborator API call failed (transport or non-2xx)
    #[error("API error: {0}")]
    Api(#[from] MoltbookError),

    /// Snapshot could not be written
    #[error("failed to write snapshot to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for indexer operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Result type alias for collaborator API calls.
pub type ApiResult<T> = std::result::Result<T, MoltbookError>;
