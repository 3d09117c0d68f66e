//! Error types for the Moltbook client.

use thiserror::Error;

/// Result type for Moltbook client operations.
pub type Result<T> = std::result::Result<T, MoltbookError>;

/// Moltbook client errors.
#[derive(Debug, Error)]
pub enum MoltbookError {
    /// Configuration error (missing API key, invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not in a recognised shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl MoltbookError {
    /// HTTP status for API errors, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            MoltbookError::Api { status, .. } => Some(*status),
            MoltbookError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
