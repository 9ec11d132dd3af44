//! Infrastructure layer for TaskWeave.
//!
//! Concrete persistence and configuration: the JSON-file task store, platform
//! path resolution, and loading of API credentials from the configuration
//! file with environment fallbacks.

pub mod config;
pub mod json_task_store;
pub mod paths;

pub use config::{OpenAiConfig, PlatformConfig, TavilyConfig};
pub use json_task_store::JsonTaskStore;
pub use paths::WeavePaths;
