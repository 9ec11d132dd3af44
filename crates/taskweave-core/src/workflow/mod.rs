//! The workflow orchestrator.
//!
//! A fixed-topology graph of steps advancing one `TaskState` record:
//!
//! ```text
//! ROUTE -> RESEARCH -> CODE -> VISUALIZE -> CHECKPOINT -> {FINALIZE | suspend}
//! ```
//!
//! The graph is invoked fresh from ROUTE for the initial submission and for
//! every feedback-driven resumption; there is no step-level cursor. A
//! resumption re-runs routing and every planned capability (full recompute),
//! with the attached feedback steering the post-checkpoint branch to
//! finalize instead of suspending again.

mod decision;

pub use decision::CheckpointDecision;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capability::{Capability, CapabilityKind, TaskRouter};
use crate::task::{FinalOutput, TaskState, TaskStatus};

/// Total mapping from capability kind to implementation.
///
/// Every kind has exactly one slot, so dispatch is exhaustive by construction
/// and a plan entry can never name a capability without an implementation.
pub struct CapabilitySet {
    research: Arc<dyn Capability>,
    code: Arc<dyn Capability>,
    visualization: Arc<dyn Capability>,
}

impl CapabilitySet {
    pub fn new(
        research: Arc<dyn Capability>,
        code: Arc<dyn Capability>,
        visualization: Arc<dyn Capability>,
    ) -> Self {
        debug_assert_eq!(research.kind(), CapabilityKind::Research);
        debug_assert_eq!(code.kind(), CapabilityKind::Code);
        debug_assert_eq!(visualization.kind(), CapabilityKind::Visualization);
        Self {
            research,
            code,
            visualization,
        }
    }

    fn get(&self, kind: CapabilityKind) -> &dyn Capability {
        match kind {
            CapabilityKind::Research => self.research.as_ref(),
            CapabilityKind::Code => self.code.as_ref(),
            CapabilityKind::Visualization => self.visualization.as_ref(),
        }
    }
}

/// The workflow orchestrator.
///
/// `run` is the single entry point: synchronous from the caller's point of
/// view (one awaited call), sequential, and total — capability failures are
/// captured as degraded payloads inside the state, never surfaced as errors.
pub struct Workflow {
    router: Arc<dyn TaskRouter>,
    capabilities: CapabilitySet,
}

impl Workflow {
    pub fn new(router: Arc<dyn TaskRouter>, capabilities: CapabilitySet) -> Self {
        Self {
            router,
            capabilities,
        }
    }

    /// Runs one full traversal of the graph over the given state.
    ///
    /// On the first pass the traversal ends suspended at the checkpoint with
    /// `status = awaiting_human_feedback`. When feedback is attached and the
    /// state is re-submitted, the same traversal re-runs from ROUTE and the
    /// post-checkpoint branch finalizes.
    pub async fn run(&self, mut state: TaskState) -> TaskState {
        info!(task_id = %state.task_id, status = %state.status, "Starting workflow traversal");

        self.route_step(&mut state).await;
        for kind in CapabilityKind::ALL {
            self.capability_step(kind, &mut state).await;
        }
        self.checkpoint_step(&mut state);

        match CheckpointDecision::evaluate(&state) {
            CheckpointDecision::Suspend => {
                info!(task_id = %state.task_id, "Workflow suspended, awaiting human feedback");
                state
            }
            CheckpointDecision::Finalize => {
                self.finalize_step(&mut state);
                state
            }
        }
    }

    /// ROUTE: selects the capability plan for the task description.
    async fn route_step(&self, state: &mut TaskState) {
        let plan = self.router.route(&state.task_description).await;
        info!(task_id = %state.task_id, plan = ?plan, "Task routed");

        let message = if plan.is_empty() {
            "Task routed to no agents".to_string()
        } else {
            format!(
                "Task routed to agents: {}",
                plan.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        state.agent_plan = plan;
        state.push_trace("router", message, None);
    }

    /// RESEARCH / CODE / VISUALIZE: conditional no-op gated on plan membership.
    async fn capability_step(&self, kind: CapabilityKind, state: &mut TaskState) {
        if !state.agent_plan.contains(&kind) {
            debug!(task_id = %state.task_id, capability = %kind, "Capability not in plan, skipping");
            return;
        }

        let context = state.results.upstream_for(kind);
        let outcome = self
            .capabilities
            .get(kind)
            .execute(&state.task_description, &context)
            .await;

        if outcome.is_degraded() {
            warn!(task_id = %state.task_id, capability = %kind, "Capability degraded to fallback result");
        }

        let data = serde_json::to_value(&outcome).ok();
        state.push_trace(kind.to_string(), step_label(kind), data);
        state.results.insert(outcome);
    }

    /// CHECKPOINT: unconditionally suspend-marks the state for human review.
    fn checkpoint_step(&self, state: &mut TaskState) {
        state.status = TaskStatus::AwaitingHumanFeedback;
        state.requires_human_input = true;

        let summary = serde_json::json!({
            "research": state.results.get(CapabilityKind::Research).is_some(),
            "code": state.results.get(CapabilityKind::Code).is_some(),
            "visualization": state.results.get(CapabilityKind::Visualization).is_some(),
        });
        state.push_trace("system", "Task processed, awaiting human review", Some(summary));
    }

    /// FINALIZE: composes the final output record and completes the task.
    fn finalize_step(&self, state: &mut TaskState) {
        state.status = TaskStatus::Completed;
        state.requires_human_input = false;

        let output = FinalOutput {
            task: state.task_description.clone(),
            completed_at: chrono::Utc::now(),
            agents_used: state.agent_plan.clone(),
            research: state.results.get(CapabilityKind::Research).cloned(),
            code: state.results.get(CapabilityKind::Code).cloned(),
            visualization: state.results.get(CapabilityKind::Visualization).cloned(),
            human_feedback: state.human_feedback.clone(),
        };
        state.results.set_final_output(output);
        state.push_trace("system", "Task finalized and completed", None);

        info!(task_id = %state.task_id, "Workflow finalized");
    }
}

fn step_label(kind: CapabilityKind) -> &'static str {
    match kind {
        CapabilityKind::Research => "Research completed",
        CapabilityKind::Code => "Code generation completed",
        CapabilityKind::Visualization => "Visualization completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{
        CapabilityOutcome, CapabilityReport, ChartKind, CodeReport, ExecutionOutcome,
        ResearchReport, UpstreamContext, VisualizationReport,
    };
    use crate::task::HumanFeedback;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubRouter {
        plan: Vec<CapabilityKind>,
    }

    #[async_trait]
    impl TaskRouter for StubRouter {
        async fn route(&self, _task: &str) -> Vec<CapabilityKind> {
            self.plan.clone()
        }
    }

    fn report_for(kind: CapabilityKind) -> CapabilityReport {
        match kind {
            CapabilityKind::Research => CapabilityReport::Research(ResearchReport {
                queries: vec!["stub query".to_string()],
                findings: "stub findings".to_string(),
                key_points: vec!["stub point".to_string()],
                sources: vec![],
            }),
            CapabilityKind::Code => CapabilityReport::Code(CodeReport {
                source: "fn main() {}".to_string(),
                language: "rust".to_string(),
                execution: ExecutionOutcome::Skipped {
                    reason: "stub".to_string(),
                },
                documentation: "stub docs".to_string(),
            }),
            CapabilityKind::Visualization => {
                CapabilityReport::Visualization(VisualizationReport {
                    plan: vec![ChartKind::GeneralAnalysis],
                    charts: vec![],
                })
            }
        }
    }

    /// Records the upstream context each invocation observed.
    struct StubCapability {
        kind: CapabilityKind,
        degraded: bool,
        seen: Mutex<Vec<(bool, bool)>>,
    }

    impl StubCapability {
        fn new(kind: CapabilityKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                degraded: false,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn degraded(kind: CapabilityKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                degraded: true,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Capability for StubCapability {
        fn kind(&self) -> CapabilityKind {
            self.kind
        }

        async fn execute(&self, _task: &str, context: &UpstreamContext) -> CapabilityOutcome {
            self.seen
                .lock()
                .unwrap()
                .push((context.research.is_some(), context.code.is_some()));
            if self.degraded {
                CapabilityOutcome::Degraded {
                    error: "stub failure".to_string(),
                    fallback: report_for(self.kind),
                }
            } else {
                CapabilityOutcome::Success {
                    report: report_for(self.kind),
                }
            }
        }
    }

    fn workflow_with(
        plan: Vec<CapabilityKind>,
        research: Arc<StubCapability>,
        code: Arc<StubCapability>,
        visualization: Arc<StubCapability>,
    ) -> Workflow {
        Workflow::new(
            Arc::new(StubRouter { plan }),
            CapabilitySet::new(research, code, visualization),
        )
    }

    fn full_stub_workflow(plan: Vec<CapabilityKind>) -> Workflow {
        workflow_with(
            plan,
            StubCapability::new(CapabilityKind::Research),
            StubCapability::new(CapabilityKind::Code),
            StubCapability::new(CapabilityKind::Visualization),
        )
    }

    fn feedback(approved: bool, text: &str) -> HumanFeedback {
        HumanFeedback {
            approved,
            feedback: text.to_string(),
            modifications: serde_json::Map::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_first_pass_suspends_at_checkpoint() {
        let plan = vec![CapabilityKind::Research, CapabilityKind::Code];
        let workflow = full_stub_workflow(plan.clone());

        let state = workflow.run(TaskState::new("research and implement")).await;

        assert_eq!(state.status, TaskStatus::AwaitingHumanFeedback);
        assert!(state.requires_human_input);
        assert_eq!(state.agent_plan, plan);
        assert_eq!(state.results.populated_kinds(), plan);
        assert!(state.results.final_output().is_none());
        // route + two capabilities + checkpoint
        assert_eq!(state.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_capability_steps_are_gated_on_plan_membership() {
        let workflow = full_stub_workflow(vec![CapabilityKind::Research]);

        let state = workflow.run(TaskState::new("Research X")).await;

        assert!(state.results.get(CapabilityKind::Research).is_some());
        assert!(state.results.get(CapabilityKind::Code).is_none());
        assert!(state.results.get(CapabilityKind::Visualization).is_none());
    }

    #[tokio::test]
    async fn test_empty_plan_runs_no_capability_steps() {
        let workflow = full_stub_workflow(vec![]);

        let state = workflow.run(TaskState::new("unroutable")).await;

        assert!(state.results.populated_kinds().is_empty());
        assert_eq!(state.status, TaskStatus::AwaitingHumanFeedback);
        // route + checkpoint only
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_approved_feedback_resumption_finalizes() {
        let plan = vec![CapabilityKind::Research];
        let workflow = full_stub_workflow(plan.clone());

        let mut state = workflow.run(TaskState::new("Research X")).await;
        state.human_feedback = Some(feedback(true, "ship it"));

        let state = workflow.run(state).await;

        assert_eq!(state.status, TaskStatus::Completed);
        assert!(!state.requires_human_input);
        let output = state.results.final_output().expect("final output");
        assert_eq!(output.agents_used, plan);
        assert!(output.research.is_some());
        assert!(output.code.is_none());
        assert!(output.human_feedback.as_ref().unwrap().approved);
    }

    #[tokio::test]
    async fn test_rejected_feedback_still_finalizes() {
        let workflow = full_stub_workflow(vec![CapabilityKind::Research]);

        let mut state = workflow.run(TaskState::new("Research X")).await;
        state.human_feedback = Some(feedback(false, "wrong angle"));

        let state = workflow.run(state).await;

        assert_eq!(state.status, TaskStatus::Completed);
        assert!(!state.requires_human_input);
        assert!(state.results.final_output().is_some());
    }

    #[tokio::test]
    async fn test_downstream_capabilities_see_upstream_results() {
        let research = StubCapability::new(CapabilityKind::Research);
        let code = StubCapability::new(CapabilityKind::Code);
        let visualization = StubCapability::new(CapabilityKind::Visualization);
        let workflow = workflow_with(
            CapabilityKind::ALL.to_vec(),
            research.clone(),
            code.clone(),
            visualization.clone(),
        );

        workflow.run(TaskState::new("everything")).await;

        assert_eq!(*research.seen.lock().unwrap(), vec![(false, false)]);
        assert_eq!(*code.seen.lock().unwrap(), vec![(true, false)]);
        assert_eq!(*visualization.seen.lock().unwrap(), vec![(true, true)]);
    }

    #[tokio::test]
    async fn test_degraded_outcome_is_recorded_not_fatal() {
        let workflow = workflow_with(
            vec![CapabilityKind::Research],
            StubCapability::degraded(CapabilityKind::Research),
            StubCapability::new(CapabilityKind::Code),
            StubCapability::new(CapabilityKind::Visualization),
        );

        let state = workflow.run(TaskState::new("flaky upstream")).await;

        let outcome = state.results.get(CapabilityKind::Research).unwrap();
        assert!(outcome.is_degraded());
        assert_eq!(state.status, TaskStatus::AwaitingHumanFeedback);
    }

    #[tokio::test]
    async fn test_resumption_recomputes_planned_capabilities() {
        let research = StubCapability::new(CapabilityKind::Research);
        let workflow = workflow_with(
            vec![CapabilityKind::Research],
            research.clone(),
            StubCapability::new(CapabilityKind::Code),
            StubCapability::new(CapabilityKind::Visualization),
        );

        let mut state = workflow.run(TaskState::new("Research X")).await;
        state.human_feedback = Some(feedback(true, "ok"));
        workflow.run(state).await;

        // Guard is plan membership, not result presence: two invocations.
        assert_eq!(research.seen.lock().unwrap().len(), 2);
    }
}
