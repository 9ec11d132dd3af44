//! Visualization capability: chart planning.
//!
//! Plans which chart families fit the task and emits renderer-agnostic chart
//! descriptors with representative demo series. Rendering is out of scope.

use async_trait::async_trait;

use taskweave_core::capability::{
    Capability, CapabilityKind, CapabilityOutcome, CapabilityReport, ChartKind, ChartSeries,
    ChartSpec, UpstreamContext, VisualizationReport,
};

/// At most this many charts are planned per task.
const MAX_CHARTS: usize = 3;

const SECTOR_KEYWORDS: [&str; 4] = ["sector", "industry", "vulnerable", "impact"];
const TIMELINE_KEYWORDS: [&str; 3] = ["timeline", "trend", "over time"];
const COMPARISON_KEYWORDS: [&str; 3] = ["algorithm", "performance", "comparison"];
const RISK_KEYWORDS: [&str; 3] = ["risk", "threat", "security"];

/// Plans chart descriptors from task keywords.
///
/// Purely deterministic: no model call is involved, so this capability never
/// degrades.
pub struct VisualizationCapability;

impl VisualizationCapability {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VisualizationCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for VisualizationCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Visualization
    }

    async fn execute(&self, task: &str, _context: &UpstreamContext) -> CapabilityOutcome {
        let plan = plan_charts(task);
        let charts = plan.iter().map(|kind| build_chart(*kind, task)).collect();

        CapabilityOutcome::Success {
            report: CapabilityReport::Visualization(VisualizationReport { plan, charts }),
        }
    }
}

/// Selects chart kinds from task keywords, defaulting to a general analysis
/// chart when nothing specific matches.
pub fn plan_charts(task: &str) -> Vec<ChartKind> {
    let task_lower = task.to_lowercase();
    let mut plan = Vec::new();

    if SECTOR_KEYWORDS.iter().any(|word| task_lower.contains(word)) {
        plan.push(ChartKind::SectorAnalysis);
    }
    if TIMELINE_KEYWORDS.iter().any(|word| task_lower.contains(word)) {
        plan.push(ChartKind::Timeline);
    }
    if COMPARISON_KEYWORDS
        .iter()
        .any(|word| task_lower.contains(word))
    {
        plan.push(ChartKind::AlgorithmComparison);
    }
    if RISK_KEYWORDS.iter().any(|word| task_lower.contains(word)) {
        plan.push(ChartKind::RiskAssessment);
    }

    if plan.is_empty() {
        plan.push(ChartKind::GeneralAnalysis);
    }
    plan.truncate(MAX_CHARTS);
    plan
}

fn build_chart(kind: ChartKind, task: &str) -> ChartSpec {
    match kind {
        ChartKind::SectorAnalysis => sector_analysis_chart(),
        ChartKind::Timeline => timeline_chart(),
        ChartKind::AlgorithmComparison => algorithm_comparison_chart(),
        ChartKind::RiskAssessment => risk_assessment_chart(),
        ChartKind::GeneralAnalysis => general_analysis_chart(task),
    }
}

fn sector_analysis_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::SectorAnalysis,
        title: "Sector Vulnerability Analysis".to_string(),
        description: "Vulnerability scores and risk timelines across sectors".to_string(),
        key_insights: vec![
            "Defense and financial services score highest on vulnerability".to_string(),
            "Transportation has the lowest immediate exposure".to_string(),
            "Most sectors face high risk within 5-8 years".to_string(),
        ],
        categories: vec![
            "Financial Services".to_string(),
            "Healthcare".to_string(),
            "Government".to_string(),
            "Defense".to_string(),
            "Technology".to_string(),
            "Energy".to_string(),
            "Telecommunications".to_string(),
            "Transportation".to_string(),
        ],
        series: vec![
            ChartSeries {
                label: "Vulnerability score".to_string(),
                values: vec![95.0, 85.0, 90.0, 98.0, 80.0, 75.0, 88.0, 70.0],
            },
            ChartSeries {
                label: "Years until high risk".to_string(),
                values: vec![5.0, 8.0, 6.0, 4.0, 7.0, 10.0, 6.0, 12.0],
            },
        ],
    }
}

fn timeline_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Timeline,
        title: "Capability and Risk Timeline".to_string(),
        description: "Projected capability growth versus exposure and readiness by year".to_string(),
        key_insights: vec![
            "The critical risk window opens around 2029-2030".to_string(),
            "Readiness lags exposure for most of the decade".to_string(),
        ],
        categories: (2024..=2034).map(|year| year.to_string()).collect(),
        series: vec![
            ChartSeries {
                label: "Capability level".to_string(),
                values: vec![20.0, 25.0, 35.0, 45.0, 60.0, 70.0, 80.0, 85.0, 90.0, 95.0, 98.0],
            },
            ChartSeries {
                label: "Current exposure".to_string(),
                values: vec![30.0, 40.0, 55.0, 70.0, 80.0, 90.0, 95.0, 98.0, 99.0, 100.0, 100.0],
            },
            ChartSeries {
                label: "Defense readiness".to_string(),
                values: vec![15.0, 20.0, 30.0, 45.0, 60.0, 75.0, 85.0, 90.0, 95.0, 98.0, 99.0],
            },
        ],
    }
}

fn algorithm_comparison_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::AlgorithmComparison,
        title: "Algorithm Comparison".to_string(),
        description: "Resistance level and performance overhead per algorithm family".to_string(),
        key_insights: vec![
            "Legacy algorithm families offer no resistance".to_string(),
            "Hash-based approaches resist best at moderate overhead".to_string(),
            "Lattice-based approaches balance security and performance".to_string(),
        ],
        categories: vec![
            "RSA-2048".to_string(),
            "ECC-256".to_string(),
            "Lattice-based".to_string(),
            "Hash-based".to_string(),
            "Multivariate".to_string(),
            "Code-based".to_string(),
        ],
        series: vec![
            ChartSeries {
                label: "Resistance score".to_string(),
                values: vec![0.0, 0.0, 85.0, 90.0, 75.0, 80.0],
            },
            ChartSeries {
                label: "Performance overhead".to_string(),
                values: vec![1.0, 1.0, 3.2, 2.1, 4.5, 2.8],
            },
        ],
    }
}

fn risk_assessment_chart() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::RiskAssessment,
        title: "Risk Assessment Matrix".to_string(),
        description: "Risk level per sector and risk factor".to_string(),
        key_insights: vec![
            "Defense shows the highest risk across every factor".to_string(),
            "Data exposure and authentication are the primary concerns".to_string(),
        ],
        categories: vec![
            "Data Exposure".to_string(),
            "System Access".to_string(),
            "Communication".to_string(),
            "Storage".to_string(),
            "Authentication".to_string(),
        ],
        series: vec![
            ChartSeries {
                label: "Financial".to_string(),
                values: vec![90.0, 85.0, 80.0, 75.0, 88.0],
            },
            ChartSeries {
                label: "Healthcare".to_string(),
                values: vec![85.0, 70.0, 75.0, 90.0, 80.0],
            },
            ChartSeries {
                label: "Government".to_string(),
                values: vec![95.0, 90.0, 85.0, 80.0, 92.0],
            },
            ChartSeries {
                label: "Defense".to_string(),
                values: vec![98.0, 95.0, 90.0, 85.0, 95.0],
            },
            ChartSeries {
                label: "Technology".to_string(),
                values: vec![75.0, 80.0, 85.0, 70.0, 78.0],
            },
            ChartSeries {
                label: "Energy".to_string(),
                values: vec![80.0, 85.0, 78.0, 82.0, 75.0],
            },
        ],
    }
}

fn general_analysis_chart(task: &str) -> ChartSpec {
    let title_hint: String = task.chars().take(50).collect();
    ChartSpec {
        kind: ChartKind::GeneralAnalysis,
        title: format!("Analysis for: {title_hint}"),
        description: format!("General analysis visualization for the task: {task}"),
        key_insights: vec!["Analysis completed with visualized results".to_string()],
        categories: vec![
            "Category A".to_string(),
            "Category B".to_string(),
            "Category C".to_string(),
            "Category D".to_string(),
            "Category E".to_string(),
        ],
        series: vec![ChartSeries {
            label: "Analysis score".to_string(),
            values: vec![65.0, 80.0, 45.0, 90.0, 72.0],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_defaults_to_general_analysis() {
        assert_eq!(plan_charts("summarize this"), vec![ChartKind::GeneralAnalysis]);
    }

    #[test]
    fn test_plan_matches_keywords() {
        assert_eq!(
            plan_charts("sector impact over time"),
            vec![ChartKind::SectorAnalysis, ChartKind::Timeline]
        );
        assert_eq!(
            plan_charts("security risk assessment"),
            vec![ChartKind::RiskAssessment]
        );
    }

    #[test]
    fn test_plan_is_capped_at_three_charts() {
        let plan = plan_charts("sector impact timeline algorithm performance risk threat");
        assert_eq!(plan.len(), MAX_CHARTS);
    }

    #[tokio::test]
    async fn test_execute_emits_one_chart_per_planned_kind() {
        let capability = VisualizationCapability::new();
        let outcome = capability
            .execute("chart the sector impact", &UpstreamContext::empty())
            .await;

        assert!(!outcome.is_degraded());
        match outcome.report() {
            CapabilityReport::Visualization(report) => {
                assert_eq!(report.plan.len(), report.charts.len());
                assert!(report.plan.contains(&ChartKind::SectorAnalysis));
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_series_lengths_match_categories() {
        for kind in [
            ChartKind::SectorAnalysis,
            ChartKind::Timeline,
            ChartKind::AlgorithmComparison,
            ChartKind::RiskAssessment,
            ChartKind::GeneralAnalysis,
        ] {
            let chart = build_chart(kind, "any task");
            for series in &chart.series {
                assert_eq!(
                    series.values.len(),
                    chart.categories.len(),
                    "series '{}' of {:?}",
                    series.label,
                    chart.kind
                );
            }
        }
    }
}
