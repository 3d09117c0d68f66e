//! Core trait abstractions.

pub mod api;
pub mod store;

pub use api::AgentApi;
pub use store::SnapshotStore;
