//! Task routing.
//!
//! The router decides which capabilities a task needs. The primary
//! implementation asks the LLM to classify the task; when that fails it falls
//! back to a deterministic keyword scan, which never returns an empty plan.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use taskweave_core::capability::{CapabilityKind, TaskRouter};

use crate::chat::{ChatClient, ChatOptions};
use crate::prompt;

const RESEARCH_KEYWORDS: [&str; 5] = ["analyze", "research", "study", "impact", "find"];
const CODE_KEYWORDS: [&str; 5] = ["algorithm", "code", "implement", "develop", "program"];
// "visualiz" covers both "visualize" and "visualization"
const VISUALIZATION_KEYWORDS: [&str; 5] = ["visualiz", "chart", "graph", "plot", "diagram"];

/// Deterministic keyword classification of a task.
///
/// Defaults to `[research]` when no keyword matches, so the fallback plan is
/// never empty.
pub fn keyword_plan(task: &str) -> Vec<CapabilityKind> {
    let task_lower = task.to_lowercase();
    let mut plan = Vec::new();

    if RESEARCH_KEYWORDS.iter().any(|word| task_lower.contains(word)) {
        plan.push(CapabilityKind::Research);
    }
    if CODE_KEYWORDS.iter().any(|word| task_lower.contains(word)) {
        plan.push(CapabilityKind::Code);
    }
    if VISUALIZATION_KEYWORDS
        .iter()
        .any(|word| task_lower.contains(word))
    {
        plan.push(CapabilityKind::Visualization);
    }

    if plan.is_empty() {
        plan.push(CapabilityKind::Research);
    }
    plan
}

/// Parses the classifier's comma-separated reply into a plan.
///
/// Unknown names are dropped, duplicates removed, and the result is
/// normalized to the fixed execution order. May legitimately be empty when
/// the reply names no known capability.
fn parse_plan(raw: &str) -> Vec<CapabilityKind> {
    let mut named = Vec::new();
    for token in raw.split(',') {
        let token = token.trim().to_lowercase();
        if let Ok(kind) = CapabilityKind::from_str(&token) {
            if !named.contains(&kind) {
                named.push(kind);
            }
        }
    }

    CapabilityKind::ALL
        .into_iter()
        .filter(|kind| named.contains(kind))
        .collect()
}

/// Router backed by an LLM classification call.
pub struct LlmRouter {
    chat: ChatClient,
}

impl LlmRouter {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }

    async fn classify(&self, task: &str) -> Result<Vec<CapabilityKind>, crate::ApiError> {
        let prompt = prompt::render("route_task", json!({ "task": task }))?;
        let reply = self.chat.complete(&prompt, ChatOptions::new(100, 0.1)).await?;
        Ok(parse_plan(&reply))
    }
}

#[async_trait]
impl TaskRouter for LlmRouter {
    async fn route(&self, task: &str) -> Vec<CapabilityKind> {
        match self.classify(task).await {
            Ok(plan) => {
                debug!(?plan, "LLM router classified task");
                plan
            }
            Err(err) => {
                warn!(error = %err, "LLM routing failed, falling back to keyword plan");
                keyword_plan(task)
            }
        }
    }
}

/// Purely deterministic router using only the keyword scan.
///
/// Useful when no classifier credentials are configured.
pub struct KeywordRouter;

#[async_trait]
impl TaskRouter for KeywordRouter {
    async fn route(&self, task: &str) -> Vec<CapabilityKind> {
        keyword_plan(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CapabilityKind::{Code, Research, Visualization};

    #[test]
    fn test_keyword_plan_matches_each_capability() {
        assert_eq!(keyword_plan("Research X"), vec![Research]);
        assert_eq!(keyword_plan("implement a sorting algorithm"), vec![Code]);
        assert_eq!(keyword_plan("plot the results"), vec![Visualization]);
    }

    #[test]
    fn test_keyword_plan_combines_matches_in_order() {
        let plan = keyword_plan("Analyze the impact, implement code, and chart the trend");
        assert_eq!(plan, vec![Research, Code, Visualization]);
    }

    #[test]
    fn test_keyword_plan_never_empty() {
        assert_eq!(keyword_plan("hello there"), vec![Research]);
        assert_eq!(keyword_plan(""), vec![Research]);
    }

    #[test]
    fn test_keyword_plan_matches_visualization_stem() {
        assert_eq!(keyword_plan("visualize quarterly revenue"), vec![Visualization]);
        assert_eq!(
            keyword_plan("build a visualization dashboard"),
            vec![Visualization]
        );
    }

    #[test]
    fn test_parse_plan_filters_unknown_names() {
        assert_eq!(parse_plan("research, summarize, code"), vec![Research, Code]);
        assert_eq!(parse_plan("nonsense"), Vec::<CapabilityKind>::new());
    }

    #[test]
    fn test_parse_plan_normalizes_order_and_duplicates() {
        assert_eq!(
            parse_plan("visualization, code, research, code"),
            vec![Research, Code, Visualization]
        );
    }

    #[test]
    fn test_parse_plan_tolerates_case_and_whitespace() {
        assert_eq!(parse_plan(" Research ,CODE "), vec![Research, Code]);
    }

    #[tokio::test]
    async fn test_keyword_router_routes_deterministically() {
        let plan = KeywordRouter.route("study the impact of inflation").await;
        assert_eq!(plan, vec![Research]);
    }
}
