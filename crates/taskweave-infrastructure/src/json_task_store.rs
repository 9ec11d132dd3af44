//! JSON-file task store.
//!
//! Persists each task snapshot as one pretty-printed JSON file under
//! `<data_dir>/tasks/<task_id>.json`. There are no cross-file transactions;
//! concurrent writers for the same task id race and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use taskweave_core::error::Result;
use taskweave_core::task::{TaskSnapshot, TaskState, TaskStore, TaskSummary};

use crate::paths::WeavePaths;

/// File-backed implementation of [`TaskStore`].
pub struct JsonTaskStore {
    base_dir: PathBuf,
}

impl JsonTaskStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The `tasks/` subdirectory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory structure cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(base_dir.join("tasks"))?;
        Ok(Self { base_dir })
    }

    /// Creates a store at the default location (`~/.taskweave`).
    pub fn default_location() -> Result<Self> {
        let base_dir = WeavePaths::default_data_dir()
            .map_err(|err| taskweave_core::WeaveError::io(err.to_string()))?;
        Self::new(base_dir)
    }

    /// Returns the file path for a given task id.
    fn task_file_path(&self, task_id: &str) -> PathBuf {
        self.base_dir.join("tasks").join(format!("{task_id}.json"))
    }

    fn load_snapshot_from_path(path: &Path) -> Result<TaskSnapshot> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl TaskStore for JsonTaskStore {
    async fn store(&self, state: &TaskState) -> Result<()> {
        let snapshot = TaskSnapshot {
            state: state.clone(),
            last_updated: Utc::now(),
        };

        let file_path = self.task_file_path(&state.task_id);
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&file_path, json)?;
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<TaskSnapshot>> {
        let file_path = self.task_file_path(task_id);
        if !file_path.exists() {
            return Ok(None);
        }
        Self::load_snapshot_from_path(&file_path).map(Some)
    }

    async fn list(&self) -> Result<Vec<TaskSummary>> {
        let tasks_dir = self.base_dir.join("tasks");
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&tasks_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match Self::load_snapshot_from_path(&path) {
                Ok(snapshot) => summaries.push(TaskSummary {
                    task_id: snapshot.state.task_id,
                    task_description: snapshot.state.task_description,
                    status: snapshot.state.status,
                    last_updated: snapshot.last_updated,
                }),
                Err(err) => {
                    // A snapshot that no longer parses should not take the
                    // whole listing down with it.
                    warn!(path = %path.display(), error = %err, "Skipping unreadable task snapshot");
                }
            }
        }

        // Most recently updated first
        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskweave_core::task::TaskStatus;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonTaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonTaskStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_store_and_get_round_trip() {
        let (store, _temp_dir) = create_test_store();

        let mut state = TaskState::new("Research X");
        state.push_trace("router", "Task routed to agents: research", None);
        store.store(&state).await.unwrap();

        let snapshot = store.get(&state.task_id).await.unwrap().unwrap();
        // Equal except for the stamped last_updated timestamp.
        assert_eq!(snapshot.state, state);
    }

    #[tokio::test]
    async fn test_get_missing_task_is_none() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get("no-such-task").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_is_an_upsert() {
        let (store, _temp_dir) = create_test_store();

        let mut state = TaskState::new("mutate me");
        store.store(&state).await.unwrap();
        let first = store.get(&state.task_id).await.unwrap().unwrap();

        state.status = TaskStatus::Completed;
        store.store(&state).await.unwrap();
        let second = store.get(&state.task_id).await.unwrap().unwrap();

        assert_eq!(second.state.status, TaskStatus::Completed);
        assert!(second.last_updated >= first.last_updated);
    }

    #[tokio::test]
    async fn test_list_returns_all_tasks() {
        let (store, _temp_dir) = create_test_store();

        let a = TaskState::new("first task");
        let b = TaskState::new("second task");
        store.store(&a).await.unwrap();
        store.store(&b).await.unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 2);
        // Most recent write first
        assert_eq!(summaries[0].task_id, b.task_id);
        assert!(summaries.iter().any(|s| s.task_description == "first task"));
    }

    #[tokio::test]
    async fn test_list_skips_unreadable_snapshots() {
        let (store, temp_dir) = create_test_store();

        let state = TaskState::new("healthy task");
        store.store(&state).await.unwrap();
        fs::write(temp_dir.path().join("tasks").join("broken.json"), "not json").unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].task_id, state.task_id);
    }
}
