//! Research capability: web search plus LLM synthesis.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use taskweave_core::capability::{
    Capability, CapabilityKind, CapabilityOutcome, CapabilityReport, ResearchReport, SourceRef,
    UpstreamContext,
};

use crate::chat::{ChatClient, ChatOptions};
use crate::error::ApiError;
use crate::prompt;
use crate::search::SearchClient;

const MAX_QUERIES: usize = 3;
const RESULTS_PER_QUERY: usize = 5;
/// Upper bound on the concatenated search content fed into synthesis.
const SYNTHESIS_INPUT_LIMIT: usize = 4000;
const FALLBACK_QUERY_LIMIT: usize = 100;

/// Gathers information for a task: derives search queries, runs them through
/// the search API, and synthesizes the findings with the LLM.
pub struct ResearchCapability {
    chat: ChatClient,
    search: SearchClient,
}

impl ResearchCapability {
    pub fn new(chat: ChatClient, search: SearchClient) -> Self {
        Self { chat, search }
    }

    /// Derives 2-3 search queries from the task description.
    ///
    /// Falls back to the truncated task text when the LLM is unavailable.
    async fn extract_queries(&self, task: &str) -> Vec<String> {
        let queries = match prompt::render("extract_queries", json!({ "task": task })) {
            Ok(prompt) => match self.chat.complete(&prompt, ChatOptions::new(200, 0.3)).await {
                Ok(reply) => parse_queries(&reply),
                Err(err) => {
                    warn!(error = %err, "Query extraction failed, using task text");
                    Vec::new()
                }
            },
            Err(err) => {
                warn!(error = %err, "Query extraction prompt failed, using task text");
                Vec::new()
            }
        };

        if queries.is_empty() {
            vec![truncate_chars(task, FALLBACK_QUERY_LIMIT)]
        } else {
            queries
        }
    }

    /// Runs the queries, returning the collected sources and the concatenated
    /// content for synthesis. Individual search failures are logged and
    /// skipped.
    async fn gather(&self, queries: &[String]) -> (Vec<SourceRef>, String) {
        let mut sources = Vec::new();
        let mut content = String::new();

        for query in queries.iter().take(MAX_QUERIES) {
            match self.search.search(query, RESULTS_PER_QUERY).await {
                Ok(response) => {
                    debug!(query = %query, hits = response.results.len(), "Search completed");
                    for hit in response.results {
                        content.push_str(&hit.title);
                        content.push_str(": ");
                        content.push_str(&hit.content);
                        content.push('\n');
                        sources.push(SourceRef {
                            title: hit.title,
                            url: hit.url,
                            snippet: None,
                        });
                    }
                }
                Err(err) => {
                    warn!(query = %query, error = %err, "Search failed, skipping query");
                }
            }
        }

        (sources, truncate_chars(&content, SYNTHESIS_INPUT_LIMIT))
    }

    async fn synthesize(&self, task: &str, content: &str) -> Result<String, ApiError> {
        let prompt = prompt::render(
            "synthesize_findings",
            json!({ "task": task, "content": content }),
        )?;
        self.chat.complete(&prompt, ChatOptions::new(1000, 0.4)).await
    }

    /// Extracts key bullet points from the synthesis.
    async fn key_points(&self, synthesis: &str) -> Vec<String> {
        let points = match prompt::render("key_findings", json!({ "synthesis": synthesis })) {
            Ok(prompt) => match self.chat.complete(&prompt, ChatOptions::new(300, 0.3)).await {
                Ok(reply) => parse_key_points(&reply),
                Err(err) => {
                    warn!(error = %err, "Key point extraction failed");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        if points.is_empty() {
            vec!["Key findings extraction unavailable".to_string()]
        } else {
            points
        }
    }
}

#[async_trait]
impl Capability for ResearchCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Research
    }

    async fn execute(&self, task: &str, _context: &UpstreamContext) -> CapabilityOutcome {
        let queries = self.extract_queries(task).await;
        let (sources, content) = self.gather(&queries).await;

        let findings = match self.synthesize(task, &content).await {
            Ok(text) => text,
            Err(err) if sources.is_empty() => {
                // Nothing searchable and no synthesis: degrade with a canned report.
                warn!(error = %err, "Research degraded, no search results and no synthesis");
                return CapabilityOutcome::Degraded {
                    error: err.to_string(),
                    fallback: CapabilityReport::Research(fallback_report(task, queries)),
                };
            }
            Err(err) => {
                warn!(error = %err, "Synthesis failed, keeping raw search results");
                "Research synthesis unavailable due to processing error.".to_string()
            }
        };

        let key_points = self.key_points(&findings).await;

        CapabilityOutcome::Success {
            report: CapabilityReport::Research(ResearchReport {
                queries,
                findings,
                key_points,
                sources,
            }),
        }
    }
}

fn parse_queries(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_QUERIES)
        .map(|line| line.to_string())
        .collect()
}

fn parse_key_points(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(|line| line.trim_start_matches('-').trim().to_string())
        .filter(|point| !point.is_empty())
        .collect()
}

fn fallback_report(task: &str, queries: Vec<String>) -> ResearchReport {
    ResearchReport {
        queries,
        findings: format!("Research information for: {task}"),
        key_points: vec!["Detailed research unavailable due to connection issues".to_string()],
        sources: Vec::new(),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
