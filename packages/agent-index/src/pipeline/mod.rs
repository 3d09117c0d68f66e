//! The update pipeline.
//!
//! - [`plan`] - full vs incremental decision and refresh set
//! - [`scan`] - post feeds to author names
//! - [`fetch`] - profiles to normalised records
//! - [`merge`] - overlay fetched records onto the previous snapshot
//! - [`update`] - one end-to-end run

pub mod fetch;
pub mod merge;
pub mod plan;
pub mod scan;
pub mod update;

pub use fetch::{fetch_agent_record, fetch_all, normalize_profile, FetchOutcome};
pub use merge::{merge_records, sort_by_karma};
pub use plan::{choose_mode, hours_since, top_by_karma, RefreshPlan, UpdateMode, UpdatePlanner, UpdateSet};
pub use scan::{AuthorSet, PostScanner};
pub use update::{AgentIndexer, UpdateResult};
