//! The persisted snapshot of all known agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::agent::AgentRecord;

/// All known agents plus indexing metadata.
///
/// `agent_count` always equals `agents.len()`; it is recomputed whenever the
/// agents change and when a document is read back.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SnapshotDocument")]
pub struct Snapshot {
    last_updated: Option<DateTime<Utc>>,
    last_full_index: Option<DateTime<Utc>>,
    agent_count: usize,
    agents: Vec<AgentRecord>,
}

/// On-disk shape, trusted for everything except the count.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument {
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    last_full_index: Option<DateTime<Utc>>,
    #[serde(default)]
    agents: Vec<AgentRecord>,
}

impl From<SnapshotDocument> for Snapshot {
    fn from(doc: SnapshotDocument) -> Self {
        Self::new(doc.last_updated, doc.last_full_index, doc.agents)
    }
}

impl Snapshot {
    /// Build a snapshot; the count is derived from `agents`.
    pub fn new(
        last_updated: Option<DateTime<Utc>>,
        last_full_index: Option<DateTime<Utc>>,
        agents: Vec<AgentRecord>,
    ) -> Self {
        Self {
            last_updated,
            last_full_index,
            agent_count: agents.len(),
            agents,
        }
    }

    /// Empty snapshot with no timestamps.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn last_full_index(&self) -> Option<DateTime<Utc>> {
        self.last_full_index
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<&AgentRecord> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Consume the snapshot, yielding its agents.
    pub fn into_agents(self) -> Vec<AgentRecord> {
        self.agents
    }
}
