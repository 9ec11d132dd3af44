//! Task state domain model.
//!
//! A `TaskState` is the unit of work: created on submission, advanced step by
//! step by the workflow, persisted between suspensions, and re-submitted to
//! the workflow when human feedback arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::capability::{CapabilityKind, CapabilityOutcome, UpstreamContext};

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    /// The task is being executed by the workflow.
    Processing,
    /// The workflow is suspended at the human checkpoint.
    AwaitingHumanFeedback,
    /// Rejected feedback was attached; the description has been annotated
    /// for the re-run.
    Modified,
    /// Approved feedback was attached; the finalizing re-run is underway.
    Completing,
    /// Terminal: the final output has been composed.
    Completed,
}

/// One entry in the append-only execution trace.
///
/// Trace messages exist for audit and observability only; control logic
/// never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMessage {
    /// Which step wrote the entry (`router`, a capability name, or `system`).
    pub agent: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Human feedback attached to a suspended task.
///
/// A second submission overwrites the first; feedback is never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanFeedback {
    pub approved: bool,
    pub feedback: String,
    #[serde(default)]
    pub modifications: serde_json::Map<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// Typed container for capability results.
///
/// One slot per capability plus the synthetic final output composed at
/// finalization. Slots are written by the corresponding workflow step and
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    research: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visualization: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_output: Option<FinalOutput>,
}

impl TaskResults {
    /// Stores an outcome in the slot matching its capability kind.
    ///
    /// A re-run overwrites the previous outcome for that slot; the guard for
    /// whether a capability runs at all is plan membership, not result
    /// presence.
    pub fn insert(&mut self, outcome: CapabilityOutcome) {
        match outcome.kind() {
            CapabilityKind::Research => self.research = Some(outcome),
            CapabilityKind::Code => self.code = Some(outcome),
            CapabilityKind::Visualization => self.visualization = Some(outcome),
        }
    }

    pub fn get(&self, kind: CapabilityKind) -> Option<&CapabilityOutcome> {
        match kind {
            CapabilityKind::Research => self.research.as_ref(),
            CapabilityKind::Code => self.code.as_ref(),
            CapabilityKind::Visualization => self.visualization.as_ref(),
        }
    }

    /// Capability kinds with a populated slot, in execution order.
    pub fn populated_kinds(&self) -> Vec<CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_some())
            .collect()
    }

    /// Builds the upstream context visible to the given capability.
    ///
    /// Research sees nothing, code sees research, visualization sees research
    /// and code. Outcomes are cloned; the payloads are small text records.
    pub fn upstream_for(&self, kind: CapabilityKind) -> UpstreamContext {
        match kind {
            CapabilityKind::Research => UpstreamContext::empty(),
            CapabilityKind::Code => UpstreamContext {
                research: self.research.clone(),
                code: None,
            },
            CapabilityKind::Visualization => UpstreamContext {
                research: self.research.clone(),
                code: self.code.clone(),
            },
        }
    }

    pub fn final_output(&self) -> Option<&FinalOutput> {
        self.final_output.as_ref()
    }

    pub fn set_final_output(&mut self, output: FinalOutput) {
        self.final_output = Some(output);
    }
}

/// The composed final record written by the finalize step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalOutput {
    /// The task description the finalizing pass ran with.
    pub task: String,
    pub completed_at: DateTime<Utc>,
    /// The plan of the finalizing pass.
    pub agents_used: Vec<CapabilityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<CapabilityOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_feedback: Option<HumanFeedback>,
}

/// The unit of work advanced by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    /// Unique identifier, assigned at creation and immutable thereafter.
    pub task_id: String,
    /// The free-text instruction. Immutable except for the annotation a
    /// rejected-feedback re-run appends.
    pub task_description: String,
    /// Capability plan selected by the router step.
    #[serde(default)]
    pub agent_plan: Vec<CapabilityKind>,
    #[serde(default)]
    pub results: TaskResults,
    /// Append-only execution trace.
    #[serde(default)]
    pub messages: Vec<TraceMessage>,
    pub status: TaskStatus,
    pub requires_human_input: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_feedback: Option<HumanFeedback>,
}

impl TaskState {
    /// Creates a fresh task record for the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            task_id: Uuid::new_v4().to_string(),
            task_description: description.into(),
            agent_plan: Vec::new(),
            results: TaskResults::default(),
            messages: Vec::new(),
            status: TaskStatus::Processing,
            requires_human_input: false,
            human_feedback: None,
        }
    }

    /// Appends a trace entry stamped with the current time.
    pub fn push_trace(
        &mut self,
        agent: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) {
        self.messages.push(TraceMessage {
            agent: agent.into(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
        });
    }
}
