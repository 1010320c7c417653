//! petgraph::StableGraph snapshot of stored edges, nodes addressed by capsule id.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use strata_core::capsule::CapsuleId;
use strata_core::models::{EdgeType, MemoryEdge};

/// Weight on a snapshot edge.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityEdge {
    pub edge_type: EdgeType,
    pub weight: f64,
    pub confidence: f64,
    pub trust_score: f64,
    pub usage_count: u64,
}

impl From<&MemoryEdge> for AffinityEdge {
    fn from(edge: &MemoryEdge) -> Self {
        Self {
            edge_type: edge.edge_type,
            weight: edge.weight,
            confidence: edge.confidence,
            trust_score: edge.trust_score,
            usage_count: edge.usage_count,
        }
    }
}

pub type AffinityStableGraph = StableGraph<CapsuleId, AffinityEdge, Directed>;

/// Graph plus a capsule id → node index map.
pub struct AffinityGraph {
    pub graph: AffinityStableGraph,
    pub node_index: HashMap<CapsuleId, NodeIndex>,
}

impl AffinityGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Build a snapshot from stored edges. Parallel edges of different
    /// types stay separate.
    pub fn from_edges(edges: &[MemoryEdge]) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    pub fn ensure_node(&mut self, id: CapsuleId) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.node_index.insert(id, idx);
        idx
    }

    /// Self-edges are ignored.
    pub fn add_edge(&mut self, edge: &MemoryEdge) {
        if edge.from_capsule_id == edge.to_capsule_id {
            return;
        }
        let from = self.ensure_node(edge.from_capsule_id);
        let to = self.ensure_node(edge.to_capsule_id);
        self.graph.add_edge(from, to, AffinityEdge::from(edge));
    }

    pub fn get_node(&self, id: CapsuleId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    /// Outgoing edges of `id` with their target capsule ids.
    pub fn outgoing(&self, id: CapsuleId) -> Vec<(CapsuleId, &AffinityEdge)> {
        let Some(idx) = self.get_node(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|e| self.graph.node_weight(e.target()).map(|to| (*to, e.weight())))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for AffinityGraph {
    fn default() -> Self {
        Self::new()
    }
}
