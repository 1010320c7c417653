use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{defaults, layer_map};
use crate::capsule::{DecayClass, MemoryLayer};

/// Blend weights for the positive score factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub decay: f64,
    pub access: f64,
    pub trust: f64,
    pub consolidation: f64,
    pub project: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: defaults::DEFAULT_WEIGHT_SEMANTIC,
            decay: defaults::DEFAULT_WEIGHT_DECAY,
            access: defaults::DEFAULT_WEIGHT_ACCESS,
            trust: defaults::DEFAULT_WEIGHT_TRUST,
            consolidation: defaults::DEFAULT_WEIGHT_CONSOLIDATION,
            project: defaults::DEFAULT_WEIGHT_PROJECT,
        }
    }
}

/// Scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Per-hour decay base for `short` capsules.
    pub decay_base_short: f64,
    /// Per-hour decay base for `medium` capsules.
    pub decay_base_medium: f64,
    /// Per-hour decay base for `long` capsules.
    pub decay_base_long: f64,
    /// Retrievals at which the access factor saturates at 1.
    pub access_saturation: f64,
    /// Project affinity when the project key matches (may exceed 1).
    pub project_match_boost: f64,
    /// Project affinity when only the session key matches.
    pub session_match: f64,
    /// Multiplier on `duplicate_score`.
    pub duplicate_penalty_weight: f64,
    /// Flat penalty for contradiction-flagged capsules.
    pub conflict_penalty: f64,
    /// Per-layer score multiplier.
    #[serde(deserialize_with = "layer_map::lenient")]
    pub layer_weights: HashMap<MemoryLayer, f64>,
}

impl ScoringConfig {
    pub fn decay_base(&self, class: DecayClass) -> f64 {
        match class {
            DecayClass::Short => self.decay_base_short,
            DecayClass::Medium => self.decay_base_medium,
            DecayClass::Long => self.decay_base_long,
        }
    }

    /// Configured weight for a layer, 1.0 when absent.
    pub fn layer_weight(&self, layer: MemoryLayer) -> f64 {
        self.layer_weights.get(&layer).copied().unwrap_or(1.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            decay_base_short: defaults::DEFAULT_DECAY_BASE_SHORT,
            decay_base_medium: defaults::DEFAULT_DECAY_BASE_MEDIUM,
            decay_base_long: defaults::DEFAULT_DECAY_BASE_LONG,
            access_saturation: defaults::DEFAULT_ACCESS_SATURATION,
            project_match_boost: defaults::DEFAULT_PROJECT_MATCH_BOOST,
            session_match: defaults::DEFAULT_SESSION_MATCH,
            duplicate_penalty_weight: defaults::DEFAULT_DUPLICATE_PENALTY_WEIGHT,
            conflict_penalty: defaults::DEFAULT_CONFLICT_PENALTY,
            layer_weights: layer_map::from_pairs(&defaults::DEFAULT_LAYER_WEIGHTS),
        }
    }
}
