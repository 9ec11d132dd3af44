//! Task domain module.
//!
//! Contains the `TaskState` record that the workflow advances, its supporting
//! value objects, and the `TaskStore` persistence trait.
//!
//! # Module Structure
//!
//! - `model`: `TaskState`, `TaskStatus`, `TaskResults`, trace and feedback types
//! - `store`: the `TaskStore` trait and its snapshot/summary types

mod model;
mod store;

// Re-export public API
pub use model::{FinalOutput, HumanFeedback, TaskResults, TaskState, TaskStatus, TraceMessage};
pub use store::{TaskSnapshot, TaskStore, TaskSummary};
