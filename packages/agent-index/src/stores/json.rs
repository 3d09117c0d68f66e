//! Snapshot persisted as a single pretty-printed JSON document.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{IndexError, Result};
use crate::traits::store::SnapshotStore;
use crate::types::Snapshot;

/// File-backed snapshot store.
///
/// Writes go to a sibling temp file which is then renamed over the target.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, source: std::io::Error) -> IndexError {
        IndexError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot yet, starting empty");
                return Snapshot::empty();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable snapshot, starting empty");
                return Snapshot::empty();
            }
        };

        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => {
                debug!(
                    path = %self.path.display(),
                    count = snapshot.agent_count(),
                    "Loaded snapshot"
                );
                snapshot
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed snapshot, starting empty");
                Snapshot::empty()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, &json)
            .await
            .map_err(|e| self.write_error(e))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.write_error(e));
        }

        debug!(path = %self.path.display(), count = snapshot.agent_count(), "Saved snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentRecord;
    use chrono::{Duration, Utc};

    fn sample() -> Snapshot {
        let now = Utc::now();
        let mut owned = AgentRecord::new("owned", now - Duration::minutes(5)).with_karma(12);
        owned.x_handle = Some("owner_x".into());
        owned.twitter_url = Some("https://twitter.com/owner_x".into());
        owned.is_claimed = true;
        owned.last_active = Some(now - Duration::hours(1));

        Snapshot::new(
            Some(now),
            Some(now - Duration::hours(2)),
            vec![owned, AgentRecord::new("plain", now).with_description("hi")],
        )
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("agents.json"));

        assert_eq!(store.load().await, Snapshot::empty());
    }

    #[tokio::test]
    async fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);

        assert_eq!(store.load().await, Snapshot::empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("agents.json"));
        let snapshot = sample();

        store.save(&snapshot).await.unwrap();

        assert_eq!(store.load().await, snapshot);
    }

    #[tokio::test]
    async fn test_save_creates_directories_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("agents.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"lastUpdated\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["agentCount"], 2);
        assert_eq!(value["agents"].as_array().unwrap().len(), 2);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let store = JsonFileStore::new(blocker.join("agents.json"));

        let err = store.save(&sample()).await.unwrap_err();

        assert!(matches!(err, IndexError::Write { .. }));
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let store = JsonFileStore::new(&path);

        assert!(store.save(&sample()).await.is_err());
        assert!(!store.temp_path().exists());
    }
}
