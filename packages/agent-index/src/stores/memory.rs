//! In-memory snapshot store for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::store::SnapshotStore;
use crate::types::Snapshot;

/// Keeps the snapshot in memory. Data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<Snapshot>>,
    saves: RwLock<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
            saves: RwLock::new(0),
        }
    }

    /// The currently stored snapshot, if any.
    pub fn current(&self) -> Option<Snapshot> {
        self.snapshot.read().unwrap().clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.read().unwrap()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Snapshot {
        self.current().unwrap_or_default()
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.write().unwrap() = Some(snapshot.clone());
        *self.saves.write().unwrap() += 1;
        Ok(())
    }
}
