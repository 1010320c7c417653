use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use strata_core::capsule::{Capsule, CapsuleId};
use strata_core::config::GraphConfig;
use strata_core::errors::{GraphError, StrataResult};
use strata_core::models::{EdgeReinforcement, EdgeType, MemoryEdge};
use strata_core::traits::{ICapsuleStorage, IEdgeStorage};

use crate::pruning;
use crate::reinforcement;
use crate::rerank::{self, RerankOutcome};
use crate::snapshot::AffinityGraph;

/// Rerank result with non-candidate neighbours resolved to capsules.
/// Cold or missing neighbours are dropped.
#[derive(Debug, Clone, Default)]
pub struct GraphRerank {
    pub boosts: BTreeMap<CapsuleId, f64>,
    pub neighbors: Vec<(Capsule, f64)>,
    pub edges_considered: usize,
}

impl GraphRerank {
    pub fn changed(&self) -> bool {
        !self.boosts.is_empty() || !self.neighbors.is_empty()
    }
}

/// Reinforcement graph over the edge store.
pub struct GraphEngine {
    edges: Arc<dyn IEdgeStorage>,
    capsules: Arc<dyn ICapsuleStorage>,
    config: GraphConfig,
}

impl GraphEngine {
    pub fn new(
        edges: Arc<dyn IEdgeStorage>,
        capsules: Arc<dyn ICapsuleStorage>,
        config: GraphConfig,
    ) -> Self {
        Self {
            edges,
            capsules,
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Upsert an edge with max-merge semantics. Self-edges are rejected.
    pub fn reinforce(
        &self,
        from: CapsuleId,
        to: CapsuleId,
        edge_type: EdgeType,
        weight: f64,
        confidence: f64,
        trust: f64,
    ) -> StrataResult<MemoryEdge> {
        if from == to {
            return Err(GraphError::InvalidEdge { from, to }.into());
        }
        self.edges.upsert_edge(&EdgeReinforcement {
            from,
            to,
            edge_type,
            weight: weight.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            trust: trust.clamp(0.0, 1.0),
            at: Utc::now(),
        })
    }

    /// Reinforce the top admitted capsules pairwise. Returns edges written.
    pub fn reinforce_co_retrieval(&self, admitted: &[CapsuleId]) -> StrataResult<usize> {
        let pairs = reinforcement::co_retrieval_pairs(admitted, &self.config, Utc::now());
        for pair in &pairs {
            self.edges.upsert_edge(pair)?;
        }
        Ok(pairs.len())
    }

    /// Parent → child edge written by refinement.
    pub fn link_refinement(
        &self,
        parent: CapsuleId,
        child: CapsuleId,
        trust: f64,
    ) -> StrataResult<MemoryEdge> {
        let weight = self.config.refinement_edge_weight;
        self.reinforce(parent, child, EdgeType::Refinement, weight, weight, trust)
    }

    /// Snapshot of all edges touching `ids`.
    pub fn snapshot(&self, ids: &[CapsuleId]) -> StrataResult<AffinityGraph> {
        Ok(AffinityGraph::from_edges(&self.edges.edges_touching(ids)?))
    }

    /// Propagate base scores through the graph and resolve admitted neighbours.
    pub fn rerank(&self, base_scores: &[(CapsuleId, f64)]) -> StrataResult<GraphRerank> {
        if base_scores.is_empty() {
            return Ok(GraphRerank::default());
        }
        let ids: Vec<CapsuleId> = base_scores.iter().map(|(id, _)| *id).collect();
        let graph = self.snapshot(&ids)?;
        let RerankOutcome {
            boosts,
            neighbors,
            edges_considered,
        } = rerank::rerank(&graph, base_scores, &self.config);

        let neighbor_ids: Vec<CapsuleId> = neighbors.keys().copied().collect();
        let resolved = if neighbor_ids.is_empty() {
            Vec::new()
        } else {
            self.capsules
                .get_capsules(&neighbor_ids)?
                .into_iter()
                .filter(|c| !c.is_cold())
                .filter_map(|c| neighbors.get(&c.id).map(|score| (c.clone(), *score)))
                .collect()
        };

        Ok(GraphRerank {
            boosts,
            neighbors: resolved,
            edges_considered,
        })
    }

    /// Incident edges, heaviest first.
    pub fn neighbors(&self, id: CapsuleId) -> StrataResult<Vec<MemoryEdge>> {
        self.edges.edges_for(id)
    }

    pub fn prune(&self) -> StrataResult<usize> {
        pruning::prune_weak_edges(self.edges.as_ref(), &self.config)
    }
}
