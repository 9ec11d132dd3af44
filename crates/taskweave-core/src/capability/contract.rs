//! Traits implemented by concrete capabilities and routers.

use async_trait::async_trait;

use super::kind::CapabilityKind;
use super::report::{CapabilityOutcome, CapabilityReport};

/// Upstream results made available to a capability invocation.
///
/// The dependency order is fixed: code sees research, visualization sees
/// research and code. Upstream capabilities never see downstream output.
#[derive(Debug, Clone, Default)]
pub struct UpstreamContext {
    pub research: Option<CapabilityOutcome>,
    pub code: Option<CapabilityOutcome>,
}

impl UpstreamContext {
    /// An empty context, used for the first capability in the chain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The research report, if the research step produced one.
    pub fn research_report(&self) -> Option<&CapabilityReport> {
        self.research.as_ref().map(|outcome| outcome.report())
    }

    /// The code report, if the code step produced one.
    pub fn code_report(&self) -> Option<&CapabilityReport> {
        self.code.as_ref().map(|outcome| outcome.report())
    }
}

/// A pluggable task-execution ability.
///
/// Implementations are infallible from the workflow's point of view: any
/// internal error (network, API, parsing) must be converted into a
/// [`CapabilityOutcome::Degraded`] value rather than surfaced as `Err`.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The kind this implementation provides.
    fn kind(&self) -> CapabilityKind;

    /// Executes the capability against the task description.
    async fn execute(&self, task: &str, context: &UpstreamContext) -> CapabilityOutcome;
}

/// Selects which capabilities a task needs.
///
/// Routing is total: implementations never return an error. An implementation
/// backed by an external classifier is expected to fall back to a
/// deterministic keyword plan internally when the classifier is unavailable.
/// The returned plan may be empty; the workflow then runs no capability steps.
#[async_trait]
pub trait TaskRouter: Send + Sync {
    /// Returns the capability plan for the task, in execution order and
    /// without duplicates.
    async fn route(&self, task: &str) -> Vec<CapabilityKind>;
}
