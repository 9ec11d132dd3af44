//! Code generation capability.
//!
//! Generates source for the task with the LLM, hands it to the sandbox seam,
//! and documents it. Actual sandboxed execution is outside this crate; the
//! shipped [`DisabledSandbox`] reports execution as skipped.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use taskweave_core::capability::{
    Capability, CapabilityKind, CapabilityOutcome, CapabilityReport, CodeReport, ExecutionOutcome,
    UpstreamContext,
};

use crate::chat::{ChatClient, ChatOptions};
use crate::prompt;

/// Target language of generated snippets.
const LANGUAGE: &str = "python";
/// Upper bound on the research synthesis passed as generation context.
const RESEARCH_CONTEXT_LIMIT: usize = 1000;

/// Narrow seam for running generated code.
///
/// Execution environments are an external concern; implementations receive
/// the raw source and report what happened.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn run(&self, source: &str) -> ExecutionOutcome;
}

/// Sandbox implementation that never executes anything.
pub struct DisabledSandbox;

#[async_trait]
impl Sandbox for DisabledSandbox {
    async fn run(&self, _source: &str) -> ExecutionOutcome {
        ExecutionOutcome::Skipped {
            reason: "sandboxed execution is disabled in this build".to_string(),
        }
    }
}

/// Generates, (optionally) executes, and documents code for a task.
pub struct CodeCapability {
    chat: ChatClient,
    sandbox: Arc<dyn Sandbox>,
}

impl CodeCapability {
    pub fn new(chat: ChatClient, sandbox: Arc<dyn Sandbox>) -> Self {
        Self { chat, sandbox }
    }

    async fn generate(&self, task: &str, research: Option<&str>) -> Result<String, crate::ApiError> {
        let prompt = prompt::render(
            "generate_code",
            json!({
                "task": task,
                "language": LANGUAGE,
                "research": research,
            }),
        )?;
        self.chat.complete(&prompt, ChatOptions::new(1500, 0.2)).await
    }

    async fn document(&self, task: &str, source: &str) -> String {
        let documented = match prompt::render("document_code", json!({ "task": task, "code": source }))
        {
            Ok(prompt) => self.chat.complete(&prompt, ChatOptions::new(500, 0.3)).await,
            Err(err) => Err(err),
        };

        match documented {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Documentation generation failed, using fallback text");
                format!("Documentation for code implementation of: {task}")
            }
        }
    }
}

#[async_trait]
impl Capability for CodeCapability {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Code
    }

    async fn execute(&self, task: &str, context: &UpstreamContext) -> CapabilityOutcome {
        let research = research_context(context);

        let source = match self.generate(task, research.as_deref()).await {
            Ok(source) => source,
            Err(err) => {
                warn!(error = %err, "Code generation degraded to fallback source");
                return CapabilityOutcome::Degraded {
                    error: err.to_string(),
                    fallback: CapabilityReport::Code(fallback_report(task)),
                };
            }
        };

        let execution = self.sandbox.run(&source).await;
        let documentation = self.document(task, &source).await;

        CapabilityOutcome::Success {
            report: CapabilityReport::Code(CodeReport {
                source,
                language: LANGUAGE.to_string(),
                execution,
                documentation,
            }),
        }
    }
}

/// Extracts the upstream research synthesis, clamped to bound prompt size.
fn research_context(context: &UpstreamContext) -> Option<String> {
    match context.research_report() {
        Some(CapabilityReport::Research(report)) if !report.findings.is_empty() => {
            Some(report.findings.chars().take(RESEARCH_CONTEXT_LIMIT).collect())
        }
        _ => None,
    }
}

fn fallback_report(task: &str) -> CodeReport {
    CodeReport {
        source: fallback_source(task),
        language: LANGUAGE.to_string(),
        execution: ExecutionOutcome::Skipped {
            reason: "generation failed, fallback stub not executed".to_string(),
        },
        documentation: format!("Documentation for code implementation of: {task}"),
    }
}

/// Minimal runnable stub used when generation fails outright.
fn fallback_source(task: &str) -> String {
    format!(
        r#"# Generated code for: {task}
def main():
    """Placeholder implementation for the requested task."""
    print("Code implementation for: {task}")
    return "Task completed successfully"


if __name__ == "__main__":
    main()
"#
    )
}
