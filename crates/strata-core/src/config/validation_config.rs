use serde::{Deserialize, Serialize};

use super::defaults;

/// Conflict and duplicate detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Pairs scoring at or above this are recorded as conflicts.
    pub contradiction_threshold: f64,
    pub jaccard_weight: f64,
    pub polarity_weight: f64,
    /// Added when the two capsules sit in different layers.
    pub layer_gap_penalty: f64,
    /// Most recent capsules of a run considered per detection pass.
    pub conflict_window: usize,
    /// Each capsule is compared with this many following capsules.
    pub conflict_lookahead: usize,
    /// Duplicate score given to members of multi-capsule clusters.
    pub duplicate_score: f64,
    /// Capsules revisited by a duplicate refresh.
    pub duplicate_refresh_limit: usize,
    /// Padded marker strings signalling negative polarity.
    pub negation_markers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            contradiction_threshold: defaults::DEFAULT_CONTRADICTION_THRESHOLD,
            jaccard_weight: defaults::DEFAULT_JACCARD_WEIGHT,
            polarity_weight: defaults::DEFAULT_POLARITY_WEIGHT,
            layer_gap_penalty: defaults::DEFAULT_LAYER_GAP_PENALTY,
            conflict_window: defaults::DEFAULT_CONFLICT_WINDOW,
            conflict_lookahead: defaults::DEFAULT_CONFLICT_LOOKAHEAD,
            duplicate_score: defaults::DEFAULT_DUPLICATE_SCORE,
            duplicate_refresh_limit: defaults::DEFAULT_DUPLICATE_REFRESH_LIMIT,
            negation_markers: defaults::DEFAULT_NEGATION_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
