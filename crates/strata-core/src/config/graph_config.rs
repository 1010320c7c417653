use serde::{Deserialize, Serialize};

use super::defaults;

/// Reinforcement graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Scale of the boost propagated along an edge.
    pub boost_factor: f64,
    /// Fraction of the boost a non-candidate neighbour is admitted with.
    pub neighbor_admission_factor: f64,
    /// Minimum trust used in propagation.
    pub trust_floor: f64,
    /// Number of top admitted capsules reinforced pairwise.
    pub co_retrieval_fan: usize,
    pub co_retrieval_weight: f64,
    pub co_retrieval_confidence: f64,
    pub co_retrieval_trust: f64,
    /// Weight of parent-to-child edges written by refinement.
    pub refinement_edge_weight: f64,
    /// Edges lighter than this are prune candidates.
    pub prune_weight_below: f64,
    /// Edges used fewer times than this are prune candidates.
    pub prune_usage_below: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            boost_factor: defaults::DEFAULT_GRAPH_BOOST_FACTOR,
            neighbor_admission_factor: defaults::DEFAULT_NEIGHBOR_ADMISSION_FACTOR,
            trust_floor: defaults::DEFAULT_EDGE_TRUST_FLOOR,
            co_retrieval_fan: defaults::DEFAULT_CO_RETRIEVAL_FAN,
            co_retrieval_weight: defaults::DEFAULT_CO_RETRIEVAL_WEIGHT,
            co_retrieval_confidence: defaults::DEFAULT_CO_RETRIEVAL_CONFIDENCE,
            co_retrieval_trust: defaults::DEFAULT_CO_RETRIEVAL_TRUST,
            refinement_edge_weight: defaults::DEFAULT_REFINEMENT_EDGE_WEIGHT,
            prune_weight_below: defaults::DEFAULT_PRUNE_WEIGHT_BELOW,
            prune_usage_below: defaults::DEFAULT_PRUNE_USAGE_BELOW,
        }
    }
}
