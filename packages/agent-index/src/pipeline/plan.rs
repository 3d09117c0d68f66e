//! Full-vs-incremental decision and refresh-set construction.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use std::fmt;
use tracing::{info, warn};

use crate::config::IndexConfig;
use crate::error::Result;
use crate::pipeline::scan::PostScanner;
use crate::traits::api::AgentApi;
use crate::types::{AgentRecord, Snapshot};

/// Names slated for refresh in one pass.
pub type UpdateSet = IndexSet<String>;

/// Candidate names plus what the scans managed to cover.
#[derive(Debug, Clone, Default)]
pub struct RefreshPlan {
    pub names: UpdateSet,

    /// Whether the introductions feed was read. When it was not, the next
    /// run must look for new introductions from the same starting point.
    pub introductions_scanned: bool,
}

/// Kind of pass. Used both for the requested mode and the chosen one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Rediscover every agent from the introductions feed.
    Full,
    /// Refresh only recently active, newly introduced and top agents.
    #[default]
    Incremental,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Full => write!(f, "full"),
            UpdateMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// Hours elapsed since `ts`; infinite when there is no timestamp.
pub fn hours_since(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match ts {
        Some(ts) => (now - ts).num_milliseconds() as f64 / 3_600_000.0,
        None => f64::INFINITY,
    }
}

/// Pick the mode for this run.
pub fn choose_mode(
    requested: UpdateMode,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    full_index_max_age_hours: f64,
) -> UpdateMode {
    let needs_full = requested == UpdateMode::Full
        || snapshot.agent_count() == 0
        || hours_since(snapshot.last_full_index(), now) > full_index_max_age_hours;

    if needs_full {
        UpdateMode::Full
    } else {
        UpdateMode::Incremental
    }
}

/// Names of the `n` highest-karma agents; ties keep their snapshot order.
pub fn top_by_karma(agents: &[AgentRecord], n: usize) -> Vec<String> {
    let mut ranked: Vec<&AgentRecord> = agents.iter().collect();
    ranked.sort_by(|a, b| b.karma.cmp(&a.karma));
    ranked.into_iter().take(n).map(|a| a.name.clone()).collect()
}

/// Builds the candidate set for a pass.
pub struct UpdatePlanner<'a> {
    config: &'a IndexConfig,
}

impl<'a> UpdatePlanner<'a> {
    pub fn new(config: &'a IndexConfig) -> Self {
        Self { config }
    }

    /// Mode for this run given the previous snapshot.
    pub fn choose_mode(&self, requested: UpdateMode, snapshot: &Snapshot, now: DateTime<Utc>) -> UpdateMode {
        choose_mode(requested, snapshot, now, self.config.full_index_max_age_hours)
    }

    /// Names to fetch for `mode`.
    ///
    /// Full passes fail if the introductions feed cannot be read, so a bad
    /// scan never replaces the snapshot with nothing. Incremental passes log
    /// feed failures and fall back to the remaining sources.
    pub async fn candidates<A: AgentApi>(
        &self,
        api: &A,
        mode: UpdateMode,
        snapshot: &Snapshot,
    ) -> Result<RefreshPlan> {
        let scanner = PostScanner::new(
            api,
            &self.config.introductions_submolt,
            self.config.page_size,
        );

        match mode {
            UpdateMode::Full => {
                let authors = scanner.scan_for_all_introduction_authors().await?;
                info!(count = authors.len(), "Found unique agents in introductions");
                Ok(RefreshPlan {
                    names: authors,
                    introductions_scanned: true,
                })
            }
            UpdateMode::Incremental => {
                let mut set = UpdateSet::new();
                let mut introductions_scanned = false;

                match scanner.scan_for_recently_active_authors().await {
                    Ok(active) => {
                        info!(count = active.len(), "Found recently active agents");
                        set.extend(active);
                    }
                    Err(e) => warn!(error = %e, "Failed to scan recent posts"),
                }

                match scanner
                    .scan_for_new_introduction_authors(snapshot.last_updated())
                    .await
                {
                    Ok(fresh) => {
                        info!(count = fresh.len(), "Found newly introduced agents");
                        set.extend(fresh);
                        introductions_scanned = true;
                    }
                    Err(e) => warn!(error = %e, "Failed to scan new introductions"),
                }

                let top = top_by_karma(snapshot.agents(), self.config.top_refresh);
                info!(count = top.len(), "Refreshing top agents by karma");
                set.extend(top);

                Ok(RefreshPlan {
                    names: set,
                    introductions_scanned,
                })
            }
        }
    }
}
