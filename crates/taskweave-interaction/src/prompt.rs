//! Prompt templates for the LLM-backed capabilities.
//!
//! Templates are compiled once into a static minijinja environment and
//! rendered with typed serde contexts.

use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ApiError;

const ROUTE_TASK: &str = "\
Analyze this task and determine which agents are needed:
Task: {{ task }}

Available agents:
- research: For gathering information, web search, analysis
- code: For generating algorithms, code implementations
- visualization: For creating charts, graphs, visual representations

Respond with only the agent names needed, separated by commas.
Example: research,code,visualization";

const EXTRACT_QUERIES: &str = "\
Extract 2-3 specific search queries for this research task:
Task: {{ task }}

Return only the search queries, one per line.
Make them specific and research-focused.";

const SYNTHESIZE_FINDINGS: &str = "\
Based on the research task and findings, provide a comprehensive synthesis:

Task: {{ task }}

Research Findings:
{{ content }}

Provide a well-structured synthesis covering:
1. Key insights relevant to the task
2. Important findings and data points
3. Current state and trends
4. Implications and considerations

Keep it comprehensive but concise.";

const KEY_FINDINGS: &str = "\
Extract 5-7 key findings from this research synthesis:

{{ synthesis }}

Return as bullet points, each starting with a dash (-).
Focus on the most important and actionable insights.";

const GENERATE_CODE: &str = "\
Generate {{ language }} code for this task:
Task: {{ task }}
{% if research %}
Research Context:
{{ research }}
{% endif %}
Requirements:
- Write clean, documented {{ language }} code
- Include comments explaining key parts
- Make it executable and functional
- Focus on the core algorithm/implementation

Return only the {{ language }} code, no explanations.";

const DOCUMENT_CODE: &str = "\
Generate clear documentation for this code:

Task: {{ task }}
Code:
{{ code }}

Provide:
1. Brief description of what the code does
2. Key functions/classes and their purpose
3. How to use/run the code
4. Any important notes or limitations

Keep it concise but informative.";

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    // Static, known-good templates; a failure here is a programming error.
    env.add_template("route_task", ROUTE_TASK)
        .expect("built-in template route_task");
    env.add_template("extract_queries", EXTRACT_QUERIES)
        .expect("built-in template extract_queries");
    env.add_template("synthesize_findings", SYNTHESIZE_FINDINGS)
        .expect("built-in template synthesize_findings");
    env.add_template("key_findings", KEY_FINDINGS)
        .expect("built-in template key_findings");
    env.add_template("generate_code", GENERATE_CODE)
        .expect("built-in template generate_code");
    env.add_template("document_code", DOCUMENT_CODE)
        .expect("built-in template document_code");
    env
});

/// Renders a named template with the given context.
pub(crate) fn render(name: &str, context: impl Serialize) -> Result<String, ApiError> {
    let template = TEMPLATES
        .get_template(name)
        .map_err(|err| ApiError::Other(format!("Unknown prompt template '{name}': {err}")))?;
    template
        .render(context)
        .map_err(|err| ApiError::Other(format!("Failed to render prompt '{name}': {err}")))
}
