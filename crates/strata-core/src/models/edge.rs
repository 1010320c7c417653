use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::CapsuleId;
use crate::errors::GraphError;

/// Kind of relation between two capsules. Several kinds may coexist on one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Both capsules were admitted into the same context.
    CoRetrieval,
    /// Embedding neighbours.
    Semantic,
    /// Parent to refinement child.
    Refinement,
}

impl EdgeType {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::CoRetrieval => "co_retrieval",
            EdgeType::Semantic => "semantic",
            EdgeType::Refinement => "refinement",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "co_retrieval" => Ok(EdgeType::CoRetrieval),
            "semantic" => Ok(EdgeType::Semantic),
            "refinement" => Ok(EdgeType::Refinement),
            other => Err(GraphError::UnknownEdgeType {
                name: other.to_string(),
            }),
        }
    }
}

/// A directed, typed edge between two capsules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEdge {
    pub id: i64,
    pub from_capsule_id: CapsuleId,
    pub to_capsule_id: CapsuleId,
    pub edge_type: EdgeType,
    pub weight: f64,
    pub confidence: f64,
    pub trust_score: f64,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_reinforced_at: DateTime<Utc>,
}

impl MemoryEdge {
    /// The endpoint opposite `id`, if the edge touches it.
    pub fn other_end(&self, id: CapsuleId) -> Option<CapsuleId> {
        if self.from_capsule_id == id {
            Some(self.to_capsule_id)
        } else if self.to_capsule_id == id {
            Some(self.from_capsule_id)
        } else {
            None
        }
    }
}

/// One reinforcement request. Values are max-merged into any existing edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeReinforcement {
    pub from: CapsuleId,
    pub to: CapsuleId,
    pub edge_type: EdgeType,
    pub weight: f64,
    pub confidence: f64,
    pub trust: f64,
    pub at: DateTime<Utc>,
}
