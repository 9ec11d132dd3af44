//! Core domain model and workflow engine for TaskWeave.
//!
//! This crate defines the task execution state machine and the contracts it
//! operates over: the closed set of capability kinds, the `Capability` and
//! `TaskRouter` traits, typed capability result payloads, the `TaskState`
//! record, and the `TaskStore` persistence trait. Concrete capabilities and
//! storage live in the sibling crates; nothing here performs network or file
//! I/O on its own.

pub mod capability;
pub mod error;
pub mod task;
pub mod workflow;

// Re-export common error type
pub use error::WeaveError;
