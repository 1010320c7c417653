//! Contradiction scoring. The default classifier is a marker-word heuristic;
//! any stronger classifier can be plugged in behind the same trait.

pub mod polarity;

use serde::{Deserialize, Serialize};

use strata_core::capsule::Capsule;
use strata_core::config::ValidationConfig;

use crate::canonical;

/// A contradiction score with the signals behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionScore {
    pub score: f64,
    pub overlap: f64,
    pub polarity_differs: bool,
    pub layers_differ: bool,
}

/// Scores how likely two capsules state opposing things about one topic.
pub trait ContradictionClassifier: Send + Sync {
    fn score(&self, a: &Capsule, b: &Capsule) -> ContradictionScore;

    fn name(&self) -> &str;
}

/// `clamp(jaccard·0.6 + polarity_gap·0.35 + layer_gap·0.15, 0, 1)`.
pub struct HeuristicClassifier {
    config: ValidationConfig,
}

impl HeuristicClassifier {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl ContradictionClassifier for HeuristicClassifier {
    fn score(&self, a: &Capsule, b: &Capsule) -> ContradictionScore {
        let markers = &self.config.negation_markers;
        let overlap = canonical::jaccard(&a.text, &b.text);
        let polarity_differs =
            polarity::is_negative(&a.text, markers) != polarity::is_negative(&b.text, markers);
        let layers_differ = a.layer != b.layer;

        let mut score = overlap * self.config.jaccard_weight;
        if polarity_differs {
            score += self.config.polarity_weight;
        }
        if layers_differ {
            score += self.config.layer_gap_penalty;
        }
        ContradictionScore {
            score: score.clamp(0.0, 1.0),
            overlap,
            polarity_differs,
            layers_differ,
        }
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
