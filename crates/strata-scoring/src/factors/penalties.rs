use strata_core::capsule::Capsule;
use strata_core::config::ScoringConfig;

pub fn duplicate(capsule: &Capsule, config: &ScoringConfig) -> f64 {
    config.duplicate_penalty_weight * capsule.duplicate_score.clamp(0.0, 1.0)
}

pub fn conflict(capsule: &Capsule, config: &ScoringConfig) -> f64 {
    if capsule.contradiction_flag {
        config.conflict_penalty
    } else {
        0.0
    }
}
