//! Wiring from configuration to a ready task service.

use std::sync::Arc;

use taskweave_core::error::Result;
use taskweave_core::workflow::{CapabilitySet, Workflow};
use taskweave_infrastructure::{JsonTaskStore, PlatformConfig};
use taskweave_interaction::{
    ChatClient, CodeCapability, DisabledSandbox, LlmRouter, ResearchCapability, SearchClient,
    VisualizationCapability,
};

use crate::task_service::TaskService;

/// Builds a fully wired [`TaskService`] from the platform configuration.
///
/// Requires OpenAI and Tavily credentials; the store lands in the configured
/// data directory (default `~/.taskweave`).
pub fn build_service(config: &PlatformConfig) -> Result<TaskService> {
    let openai = config.require_openai()?;
    let tavily = config.require_tavily()?;

    let mut chat = ChatClient::new(openai.api_key.clone());
    if let Some(model) = &openai.model {
        chat = chat.with_model(model.clone());
    }
    let search = SearchClient::new(tavily.api_key.clone());

    let router = Arc::new(LlmRouter::new(chat.clone()));
    let capabilities = CapabilitySet::new(
        Arc::new(ResearchCapability::new(chat.clone(), search)),
        Arc::new(CodeCapability::new(chat, Arc::new(DisabledSandbox))),
        Arc::new(VisualizationCapability::new()),
    );

    let store = JsonTaskStore::new(config.data_dir()?)?;

    Ok(TaskService::new(
        Workflow::new(router, capabilities),
        Arc::new(store),
    ))
}
