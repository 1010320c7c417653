use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{defaults, layer_map};
use crate::capsule::MemoryLayer;

/// Admission controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Global cap on admitted capsules per query.
    pub max_active_contexts: usize,
    /// Default number of results returned.
    pub top_k: usize,
    /// Candidates below this score are skipped unless nothing passes.
    pub min_score: f64,
    /// Rerank band size is `top_k * band_multiplier`.
    pub band_multiplier: usize,
    /// Recency bump applied to each admitted capsule.
    pub recency_nudge: f64,
    /// Number of factors recorded as dominant in the admission reason.
    pub dominant_factors: usize,
    /// Enable graph rerank of the candidate band.
    pub graph_rerank: bool,
    /// Per-layer admission budget.
    #[serde(deserialize_with = "layer_map::lenient")]
    pub layer_budgets: HashMap<MemoryLayer, usize>,
}

impl AdmissionConfig {
    /// Budget for a layer. Absent layers may use the whole global cap.
    pub fn layer_budget(&self, layer: MemoryLayer) -> usize {
        self.layer_budgets
            .get(&layer)
            .copied()
            .unwrap_or(self.max_active_contexts)
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_active_contexts: defaults::DEFAULT_MAX_ACTIVE_CONTEXTS,
            top_k: defaults::DEFAULT_TOP_K,
            min_score: defaults::DEFAULT_MIN_SCORE,
            band_multiplier: defaults::DEFAULT_BAND_MULTIPLIER,
            recency_nudge: defaults::DEFAULT_RECENCY_NUDGE,
            dominant_factors: defaults::DEFAULT_DOMINANT_FACTORS,
            graph_rerank: true,
            layer_budgets: layer_map::from_pairs(&defaults::DEFAULT_LAYER_BUDGETS),
        }
    }
}
