//! Concrete capabilities for TaskWeave.
//!
//! This crate implements the `Capability` and `TaskRouter` contracts from
//! `taskweave-core` against real services: OpenAI chat completions for
//! routing, synthesis and code generation, and Tavily for web search. All
//! configuration (API keys, model names) is passed explicitly into
//! constructors; there are no ambient singletons.
//!
//! Capabilities degrade gracefully: client errors are logged and converted
//! into fallback payloads, never surfaced to the workflow as failures.

pub mod chat;
pub mod code;
mod error;
mod prompt;
pub mod research;
pub mod router;
pub mod search;
pub mod visualization;

pub use chat::{ChatClient, ChatOptions};
pub use code::{CodeCapability, DisabledSandbox, Sandbox};
pub use error::ApiError;
pub use research::ResearchCapability;
pub use router::{KeywordRouter, LlmRouter, keyword_plan};
pub use search::SearchClient;
pub use visualization::VisualizationCapability;
