//! Score propagation along outgoing edges of the candidate band.

use std::collections::{BTreeMap, HashSet};

use strata_core::capsule::CapsuleId;
use strata_core::config::GraphConfig;

use crate::snapshot::{AffinityEdge, AffinityGraph};

/// Result of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RerankOutcome {
    /// Boost added to each candidate that received any.
    pub boosts: BTreeMap<CapsuleId, f64>,
    /// Non-candidate neighbours and the score they would enter with.
    pub neighbors: BTreeMap<CapsuleId, f64>,
    pub edges_considered: usize,
}

impl RerankOutcome {
    pub fn changed(&self) -> bool {
        !self.boosts.is_empty() || !self.neighbors.is_empty()
    }
}

/// Boost carried by one edge from a source with score `source_score`:
/// `source_score × boost_factor × weight × confidence × max(trust_floor, trust)`.
pub fn edge_boost(source_score: f64, edge: &AffinityEdge, config: &GraphConfig) -> f64 {
    source_score
        * config.boost_factor
        * edge.weight
        * edge.confidence
        * edge.trust_score.max(config.trust_floor)
}

/// Propagate each candidate's base score to its outgoing neighbours.
/// Sources always contribute their pre-rerank score, so the result does
/// not depend on candidate order.
pub fn rerank(
    graph: &AffinityGraph,
    base_scores: &[(CapsuleId, f64)],
    config: &GraphConfig,
) -> RerankOutcome {
    let candidates: HashSet<CapsuleId> = base_scores.iter().map(|(id, _)| *id).collect();
    let mut outcome = RerankOutcome::default();
    let mut neighbor_sums: BTreeMap<CapsuleId, f64> = BTreeMap::new();

    for &(source, score) in base_scores {
        for (target, edge) in graph.outgoing(source) {
            outcome.edges_considered += 1;
            let boost = edge_boost(score, edge, config);
            if boost <= 0.0 {
                continue;
            }
            let bucket = if candidates.contains(&target) {
                &mut outcome.boosts
            } else {
                &mut neighbor_sums
            };
            *bucket.entry(target).or_insert(0.0) += boost;
        }
    }

    outcome.neighbors = neighbor_sums
        .into_iter()
        .map(|(id, sum)| (id, sum * config.neighbor_admission_factor))
        .collect();
    outcome
}
