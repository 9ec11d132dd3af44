//! Task store trait.
//!
//! Defines the interface for task snapshot persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{TaskState, TaskStatus};
use crate::error::Result;

/// A persisted task snapshot: the full state plus the write timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub state: TaskState,
    pub last_updated: DateTime<Utc>,
}

/// Listing entry for a stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: String,
    pub task_description: String,
    pub status: TaskStatus,
    pub last_updated: DateTime<Utc>,
}

/// An abstract store for task snapshots, keyed by task id.
///
/// This trait decouples the workflow and service layers from the concrete
/// storage medium (JSON files, a database, a remote API). No transactional
/// guarantees are made across operations; concurrent writers for the same
/// task id race and the last write wins.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a full snapshot of the task state.
    ///
    /// This is an idempotent upsert; every call stamps a fresh
    /// `last_updated` timestamp.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Snapshot written
    /// - `Err(_)`: Error occurred during the write
    async fn store(&self, state: &TaskState) -> Result<()>;

    /// Finds a snapshot by task id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(TaskSnapshot))`: Task found
    /// - `Ok(None)`: Task not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn get(&self, task_id: &str) -> Result<Option<TaskSnapshot>>;

    /// Lists all stored tasks, most recently updated first.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<TaskSummary>)`: One summary per stored task
    /// - `Err(_)`: Error occurred during listing
    async fn list(&self) -> Result<Vec<TaskSummary>>;
}
