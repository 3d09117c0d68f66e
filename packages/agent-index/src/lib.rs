//! Moltbook Agent Index
//!
//! Maintains a local JSON snapshot of agent profiles scraped from the Moltbook
//! API, refreshed either by a full crawl of the introductions feed or by a
//! cheaper incremental pass.
//!
//! # Usage
//!
//! ```rust,ignore
//! use agent_index::{AgentApiExt, AgentIndexer, IndexConfig, JsonFileStore, UpdateMode};
//! use moltbook_client::MoltbookClient;
//!
//! let config = IndexConfig::from_env()?;
//! let api = MoltbookClient::from_env()?.rate_limited(config.request_interval);
//! let store = JsonFileStore::new(&config.output_path);
//!
//! let result = AgentIndexer::new(api, store, config)
//!     .run(UpdateMode::Incremental)
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator API and snapshot store abstractions
//! - [`types`] - Agent records and the snapshot
//! - [`pipeline`] - Planning, scanning, fetching, merging
//! - [`stores`] - Snapshot stores (JSON file, memory)
//! - [`rate_limited`] - Fixed-interval request gate
//! - [`testing`] - Mock API for tests

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rate_limited;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use config::IndexConfig;
pub use error::{ApiResult, IndexError, Result};
pub use pipeline::{AgentIndexer, UpdateMode, UpdateResult};
pub use rate_limited::{AgentApiExt, FixedIntervalGate, RateLimitedApi};
pub use stores::{JsonFileStore, MemoryStore};
pub use traits::{AgentApi, SnapshotStore};
pub use types::{AgentRecord, Snapshot};

pub use testing::MockApi;
