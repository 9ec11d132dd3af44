//! Application layer for TaskWeave.
//!
//! This crate provides the task service that coordinates the workflow engine
//! and the task store to implement the submit / feedback / retrieve use
//! cases, plus the bootstrap wiring from configuration to a ready service.

pub mod bootstrap;
pub mod task_service;

pub use bootstrap::build_service;
pub use task_service::{FeedbackRequest, TaskService};
