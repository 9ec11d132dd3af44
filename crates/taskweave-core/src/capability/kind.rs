//! The closed set of capability kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies one of the fixed capabilities a task can be routed to.
///
/// The wire names (`research`, `code`, `visualization`) are what the router
/// emits and what the persisted task snapshots contain. The set is closed:
/// routing resolves to variants of this enum, never to free-form strings, so
/// the mapping from kind to implementation is exhaustive by construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CapabilityKind {
    /// Information gathering: web search plus synthesis.
    Research,
    /// Code generation with a sandboxed execution seam.
    Code,
    /// Chart planning (descriptors only, no rendering).
    Visualization,
}

impl CapabilityKind {
    /// All capability kinds in their fixed execution order:
    /// research first, then code, then visualization.
    ///
    /// Downstream kinds may consult upstream outputs, never the reverse.
    pub const ALL: [CapabilityKind; 3] = [
        CapabilityKind::Research,
        CapabilityKind::Code,
        CapabilityKind::Visualization,
    ];
}
