//! One indexing run: plan → scan → fetch → merge → persist.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::IndexConfig;
use crate::error::Result;
use crate::pipeline::fetch::fetch_all;
use crate::pipeline::merge::merge_records;
use crate::pipeline::plan::{UpdateMode, UpdatePlanner};
use crate::traits::{api::AgentApi, store::SnapshotStore};
use crate::types::Snapshot;

/// Result of an update run.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    /// Mode actually used
    pub mode: UpdateMode,

    /// Number of names slated for refresh
    pub candidates: usize,

    /// Number of profiles successfully fetched
    pub fetched: usize,

    /// Names whose fetch failed
    pub failed: Vec<String>,

    /// Agents in the saved snapshot
    pub agent_count: usize,
}

impl UpdateResult {
    /// Check if every candidate was fetched.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives update runs against an API and a snapshot store.
///
/// Network calls are issued one at a time; wrap the API with
/// [`rate_limited`](crate::rate_limited::AgentApiExt::rate_limited) to space
/// them out.
pub struct AgentIndexer<A: AgentApi, S: SnapshotStore> {
    api: A,
    store: S,
    config: IndexConfig,
}

impl<A: AgentApi, S: SnapshotStore> AgentIndexer<A, S> {
    pub fn new(api: A, store: S, config: IndexConfig) -> Self {
        Self { api, store, config }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one pass now.
    pub async fn run(&self, requested: UpdateMode) -> Result<UpdateResult> {
        self.run_at(requested, Utc::now()).await
    }

    /// Run one pass as of `now`.
    pub async fn run_at(&self, requested: UpdateMode, now: DateTime<Utc>) -> Result<UpdateResult> {
        let previous = self.store.load().await;
        let planner = UpdatePlanner::new(&self.config);

        let mode = planner.choose_mode(requested, &previous, now);
        info!(
            %mode,
            requested = %requested,
            existing = previous.agent_count(),
            "Starting agent index update"
        );

        // Refresh set is fixed against the previous snapshot before any fetch.
        let plan = planner.candidates(&self.api, mode, &previous).await?;
        let candidates = plan.names;
        info!(count = candidates.len(), "Agents to fetch");

        let outcome = fetch_all(&self.api, &candidates).await;
        let fetched = outcome.records.len();

        let snapshot = match mode {
            UpdateMode::Full => {
                Snapshot::new(Some(now), Some(now), merge_records(Vec::new(), outcome.records))
            }
            UpdateMode::Incremental => {
                // Unread introductions stay inside the next run's window.
                let last_updated = if plan.introductions_scanned {
                    Some(now)
                } else {
                    warn!("Introductions not scanned, keeping previous lastUpdated");
                    previous.last_updated()
                };
                let last_full_index = previous.last_full_index();
                Snapshot::new(
                    last_updated,
                    last_full_index,
                    merge_records(previous.into_agents(), outcome.records),
                )
            }
        };

        self.store.save(&snapshot).await?;

        let result = UpdateResult {
            mode,
            candidates: candidates.len(),
            fetched,
            failed: outcome.failed,
            agent_count: snapshot.agent_count(),
        };

        info!(
            %mode,
            fetched = result.fetched,
            failed = result.failed.len(),
            total = result.agent_count,
            "Agent index update complete"
        );

        Ok(result)
    }
}
