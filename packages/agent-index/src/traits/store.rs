//! Snapshot storage trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Snapshot;

/// Owner of the persisted snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the current snapshot.
    ///
    /// Never fails: missing or unreadable state yields [`Snapshot::empty`].
    async fn load(&self) -> Snapshot;

    /// Replace the persisted snapshot.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
