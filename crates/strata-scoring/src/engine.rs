use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use strata_core::capsule::Capsule;
use strata_core::config::ScoringConfig;
use strata_core::models::ScoreBreakdown;

use crate::factors::QueryContext;
use crate::formula;

/// A candidate with its score and the factors behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCapsule {
    pub capsule: Capsule,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scores candidates against a query. Pure over its inputs, so batches are
/// scored in parallel.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one capsule. Returns the final score and the full breakdown.
    pub fn score(
        &self,
        capsule: &Capsule,
        vector: &[f32],
        ctx: &QueryContext) -> (f64, ScoreBreakdown,
    ) {
        let breakdown = formula::compute_breakdown(capsule, vector, ctx, &self.config);
        (breakdown.final_score, breakdown)
    }

    /// Score a candidate pool, applying per-source multipliers (missing
    /// sources weigh 1.0). Output keeps input order.
    pub fn score_batch(
        &self,
        candidates: &[(Capsule, Vec<f32>)],
        ctx: &QueryContext,
        source_weights: &HashMap<String, f64>,
    ) -> Vec<ScoredCapsule> {
        candidates
            .par_iter()
            .map(|(capsule, vector)| {
                let mut breakdown = formula::compute_breakdown(capsule, vector, ctx, &self.config);
                let source_weight = source_weights
                    .get(&capsule.source)
                    .copied()
                    .unwrap_or(1.0)
                    .max(0.0);
                breakdown.source_weight = source_weight;
                breakdown.final_score *= source_weight;
                ScoredCapsule {
                    score: breakdown.final_score,
                    capsule: capsule.clone(),
                    breakdown,
                }
            })
            .collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
