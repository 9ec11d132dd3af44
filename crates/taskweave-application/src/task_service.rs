//! Task service use cases.
//!
//! Drives the workflow engine and the task store: task submission, feedback
//! submission (the one pause/resume cycle), and retrieval.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use taskweave_core::error::{Result, WeaveError};
use taskweave_core::task::{HumanFeedback, TaskSnapshot, TaskState, TaskStatus, TaskStore, TaskSummary};
use taskweave_core::workflow::Workflow;

/// Feedback submitted for a suspended task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub approved: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub modifications: serde_json::Map<String, serde_json::Value>,
}

/// Coordinates the workflow engine and the task store.
///
/// One service instance handles any number of tasks. Note that nothing here
/// serializes concurrent invocations for the same task id: a duplicate
/// feedback submission racing another run is resolved by the store's
/// last-write-wins semantics, not by a lease.
pub struct TaskService {
    workflow: Workflow,
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(workflow: Workflow, store: Arc<dyn TaskStore>) -> Self {
        Self { workflow, store }
    }

    /// Submits a new task and runs the first workflow pass.
    ///
    /// The returned state is suspended at the human checkpoint. Persistence
    /// failures are logged and do not fail the submission; the returned
    /// in-memory state is authoritative for this invocation.
    pub async fn submit(&self, description: impl Into<String>) -> TaskState {
        let state = TaskState::new(description);
        info!(task_id = %state.task_id, "Task submitted");

        let state = self.workflow.run(state).await;
        self.persist(&state).await;
        state
    }

    /// Attaches human feedback to a stored task and resumes it.
    ///
    /// Approved feedback re-runs the graph to finalization under the stored
    /// description. Rejected feedback annotates the description with the
    /// feedback text and re-runs; under the single-pass policy that run also
    /// finalizes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no task with the given id is stored.
    pub async fn submit_feedback(
        &self,
        task_id: &str,
        request: FeedbackRequest,
    ) -> Result<TaskState> {
        let snapshot = self
            .store
            .get(task_id)
            .await?
            .ok_or_else(|| WeaveError::not_found("task", task_id))?;

        let mut state = snapshot.state;
        state.human_feedback = Some(HumanFeedback {
            approved: request.approved,
            feedback: request.feedback.clone(),
            modifications: request.modifications,
            timestamp: Utc::now(),
        });

        if request.approved {
            info!(task_id = %task_id, "Feedback approved, finalizing");
            state.status = TaskStatus::Completing;
        } else {
            info!(task_id = %task_id, "Feedback rejected, re-running with annotated description");
            state.status = TaskStatus::Modified;
            state.task_description = format!(
                "{} (Modified based on feedback: {})",
                state.task_description, request.feedback
            );
        }

        let state = self.workflow.run(state).await;
        self.persist(&state).await;
        Ok(state)
    }

    /// Retrieves a stored task snapshot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no task with the given id is stored.
    pub async fn get(&self, task_id: &str) -> Result<TaskSnapshot> {
        self.store
            .get(task_id)
            .await?
            .ok_or_else(|| WeaveError::not_found("task", task_id))
    }

    /// Lists all stored tasks, most recently updated first.
    pub async fn list(&self) -> Result<Vec<TaskSummary>> {
        self.store.list().await
    }

    async fn persist(&self, state: &TaskState) {
        if let Err(err) = self.store.store(state).await {
            warn!(
                task_id = %state.task_id,
                error = %err,
                "Failed to persist task snapshot, continuing with in-memory state"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use taskweave_core::capability::{
        Capability, CapabilityKind, CapabilityOutcome, CapabilityReport, ChartKind, CodeReport,
        ExecutionOutcome, ResearchReport, UpstreamContext, VisualizationReport,
    };
    use taskweave_core::workflow::CapabilitySet;
    use taskweave_infrastructure::JsonTaskStore;
    use taskweave_interaction::KeywordRouter;
    use tempfile::TempDir;

    struct CannedCapability {
        kind: CapabilityKind,
    }

    #[async_trait]
    impl Capability for CannedCapability {
        fn kind(&self) -> CapabilityKind {
            self.kind
        }

        async fn execute(&self, _task: &str, _context: &UpstreamContext) -> CapabilityOutcome {
            let report = match self.kind {
                CapabilityKind::Research => CapabilityReport::Research(ResearchReport {
                    queries: vec!["canned".to_string()],
                    findings: "canned findings".to_string(),
                    key_points: vec![],
                    sources: vec![],
                }),
                CapabilityKind::Code => CapabilityReport::Code(CodeReport {
                    source: "print('ok')".to_string(),
                    language: "python".to_string(),
                    execution: ExecutionOutcome::Skipped {
                        reason: "test".to_string(),
                    },
                    documentation: "canned docs".to_string(),
                }),
                CapabilityKind::Visualization => {
                    CapabilityReport::Visualization(VisualizationReport {
                        plan: vec![ChartKind::GeneralAnalysis],
                        charts: vec![],
                    })
                }
            };
            CapabilityOutcome::Success { report }
        }
    }

    fn canned_workflow() -> Workflow {
        Workflow::new(
            Arc::new(KeywordRouter),
            CapabilitySet::new(
                Arc::new(CannedCapability {
                    kind: CapabilityKind::Research,
                }),
                Arc::new(CannedCapability {
                    kind: CapabilityKind::Code,
                }),
                Arc::new(CannedCapability {
                    kind: CapabilityKind::Visualization,
                }),
            ),
        )
    }

    fn create_test_service() -> (TaskService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonTaskStore::new(temp_dir.path()).unwrap();
        (TaskService::new(canned_workflow(), Arc::new(store)), temp_dir)
    }

    #[tokio::test]
    async fn test_submit_suspends_and_persists() {
        let (service, _temp_dir) = create_test_service();

        let state = service.submit("Research X").await;

        assert_eq!(state.status, TaskStatus::AwaitingHumanFeedback);
        assert!(state.requires_human_input);
        assert_eq!(state.agent_plan, vec![CapabilityKind::Research]);

        let stored = service.get(&state.task_id).await.unwrap();
        assert_eq!(stored.state, state);
    }

    #[tokio::test]
    async fn test_approved_feedback_completes_task() {
        let (service, _temp_dir) = create_test_service();
        let submitted = service.submit("Research X").await;

        let state = service
            .submit_feedback(
                &submitted.task_id,
                FeedbackRequest {
                    approved: true,
                    feedback: "looks good".to_string(),
                    modifications: serde_json::Map::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(state.status, TaskStatus::Completed);
        assert!(!state.requires_human_input);
        // Plan unchanged by re-routing the same description
        let output = state.results.final_output().expect("final output");
        assert_eq!(output.agents_used, vec![CapabilityKind::Research]);
        assert!(output.research.is_some());
        assert!(output.code.is_none());
        assert!(output.visualization.is_none());

        // The terminal state is what got persisted
        let stored = service.get(&state.task_id).await.unwrap();
        assert_eq!(stored.state.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_rejected_feedback_annotates_and_completes() {
        let (service, _temp_dir) = create_test_service();
        let submitted = service.submit("Research X").await;
        let original_description = submitted.task_description.clone();

        let state = service
            .submit_feedback(
                &submitted.task_id,
                FeedbackRequest {
                    approved: false,
                    feedback: "focus on healthcare".to_string(),
                    modifications: serde_json::Map::new(),
                },
            )
            .await
            .unwrap();

        // Single-pass policy: the rejected re-run still finalizes.
        assert_eq!(state.status, TaskStatus::Completed);
        assert_ne!(state.task_description, original_description);
        assert!(state.task_description.contains("focus on healthcare"));
    }

    #[tokio::test]
    async fn test_feedback_for_unknown_task_is_not_found() {
        let (service, _temp_dir) = create_test_service();

        let err = service
            .submit_feedback(
                "no-such-task",
                FeedbackRequest {
                    approved: true,
                    feedback: String::new(),
                    modifications: serde_json::Map::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        // No state was created as a side effect
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_task_is_not_found() {
        let (service, _temp_dir) = create_test_service();
        assert!(service.get("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_summarizes_submitted_tasks() {
        let (service, _temp_dir) = create_test_service();
        let state = service.submit("Research X").await;

        let summaries = service.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].task_id, state.task_id);
        assert_eq!(summaries[0].status, TaskStatus::AwaitingHumanFeedback);
    }
}
