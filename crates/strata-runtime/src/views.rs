use serde::{Deserialize, Serialize};

use strata_core::capsule::{Capsule, MemoryCapsuleState};
use strata_core::models::{MemoryEdge, MemorySummary};

/// A capsule with its state row, direct children, incident edges and
/// refinement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapsuleDetail {
    pub capsule: Capsule,
    pub state: Option<MemoryCapsuleState>,
    pub children: Vec<Capsule>,
    pub edges: Vec<MemoryEdge>,
    pub summary: Option<MemorySummary>,
}

/// Root capsule plus every capsule derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineage {
    pub root: Capsule,
    pub members: Vec<Capsule>,
}
