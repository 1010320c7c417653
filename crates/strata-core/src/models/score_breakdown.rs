use serde::{Deserialize, Serialize};

/// Weighted contribution of one factor to a blended score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: String,
    pub value: f64,
    pub contribution: f64,
}

/// Every factor that went into a candidate's score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub decay: f64,
    pub access: f64,
    pub trust: f64,
    pub consolidation: f64,
    /// Raw project affinity; may exceed 1.
    pub project_match: f64,
    pub layer_weight: f64,
    pub duplicate_penalty: f64,
    pub conflict_penalty: f64,
    /// Positive weighted blend before penalties.
    pub blend: f64,
    /// Multiplier from the caller's per-source weights.
    pub source_weight: f64,
    /// Boost added by graph rerank.
    pub graph_boost: f64,
    pub contributions: Vec<FactorContribution>,
    pub final_score: f64,
}

impl ScoreBreakdown {
    /// The `n` largest weighted contributions, largest first.
    pub fn dominant_factors(&self, n: usize) -> Vec<FactorContribution> {
        let mut sorted = self.contributions.clone();
        sorted.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }
}
