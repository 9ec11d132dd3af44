//! Capability contract.
//!
//! A capability is one of the pluggable task-execution abilities (research,
//! code generation, chart planning) invoked by the workflow. This module
//! defines the closed set of capability kinds, the typed result payloads each
//! capability produces, and the traits concrete implementations plug into.
//!
//! # Module Structure
//!
//! - `kind`: the closed `CapabilityKind` enumeration
//! - `report`: typed result payloads (`CapabilityReport`, `CapabilityOutcome`)
//! - `contract`: the `Capability` and `TaskRouter` traits

mod contract;
mod kind;
mod report;

// Re-export public API
pub use contract::{Capability, TaskRouter, UpstreamContext};
pub use kind::CapabilityKind;
pub use report::{
    CapabilityOutcome, CapabilityReport, ChartKind, ChartSeries, ChartSpec, CodeReport,
    ExecutionOutcome, ResearchReport, SourceRef, VisualizationReport,
};
