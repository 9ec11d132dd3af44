//! Typed capability result payloads.
//!
//! Each capability produces one variant of [`CapabilityReport`]; the workflow
//! stores them without inspecting their contents. A capability that cannot
//! complete produces a [`CapabilityOutcome::Degraded`] outcome carrying the
//! error message and a best-effort fallback report, so downstream steps never
//! see a hard-absent result.

use serde::{Deserialize, Serialize};

use super::kind::CapabilityKind;

/// A single source reference backing a research finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Result payload of the research capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    /// Search queries derived from the task description.
    pub queries: Vec<String>,
    /// Synthesized findings text.
    pub findings: String,
    /// Key points extracted from the synthesis.
    pub key_points: Vec<String>,
    /// Sources consulted while searching.
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// Outcome of running generated code through the sandbox seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The sandbox declined to run the code.
    Skipped { reason: String },
    /// The code ran to completion.
    Completed { output: String },
    /// The code ran but failed.
    Failed { error: String },
}

/// Result payload of the code generation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReport {
    /// Generated source text.
    pub source: String,
    /// Language of the generated source.
    pub language: String,
    /// What happened when the source was handed to the sandbox.
    pub execution: ExecutionOutcome,
    /// Generated usage documentation.
    pub documentation: String,
}

/// The chart families the visualization planner can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SectorAnalysis,
    Timeline,
    AlgorithmComparison,
    RiskAssessment,
    GeneralAnalysis,
}

/// One named series of values within a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// A renderer-agnostic chart descriptor.
///
/// Rendering is out of scope; consumers (dashboard, notebook, etc.) draw the
/// chart from the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub description: String,
    pub key_insights: Vec<String>,
    /// Category labels shared by every series in the chart.
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// Result payload of the visualization capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationReport {
    /// Chart kinds the planner selected for the task.
    pub plan: Vec<ChartKind>,
    pub charts: Vec<ChartSpec>,
}

/// Closed union of capability result payloads, one variant per capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityReport {
    Research(ResearchReport),
    Code(CodeReport),
    Visualization(VisualizationReport),
}

impl CapabilityReport {
    /// The capability kind that produced this report.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            CapabilityReport::Research(_) => CapabilityKind::Research,
            CapabilityReport::Code(_) => CapabilityKind::Code,
            CapabilityReport::Visualization(_) => CapabilityKind::Visualization,
        }
    }
}

/// Success/degraded tagged result of one capability invocation.
///
/// Capabilities degrade gracefully instead of aborting the workflow: an
/// internal failure is captured here as `Degraded` with a fallback payload,
/// and the workflow treats both variants as normal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CapabilityOutcome {
    Success {
        report: CapabilityReport,
    },
    Degraded {
        error: String,
        fallback: CapabilityReport,
    },
}

impl CapabilityOutcome {
    /// The report carried by this outcome (the fallback when degraded).
    pub fn report(&self) -> &CapabilityReport {
        match self {
            CapabilityOutcome::Success { report } => report,
            CapabilityOutcome::Degraded { fallback, .. } => fallback,
        }
    }

    /// The capability kind that produced this outcome.
    pub fn kind(&self) -> CapabilityKind {
        self.report().kind()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CapabilityOutcome::Degraded { .. })
    }
}
