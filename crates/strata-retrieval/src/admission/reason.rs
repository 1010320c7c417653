use strata_core::models::AdmissionReason;

use super::AdmittedCandidate;

/// The structured reason stored on the activation row.
pub fn build(admitted: &AdmittedCandidate, dominant_factors: usize) -> AdmissionReason {
    let scored = &admitted.candidate.scored;
    AdmissionReason {
        admission: admitted.candidate.kind,
        layer_budget: admitted.layer_budget,
        layer_slot: admitted.layer_slot,
        rank_score: scored.score,
        dominant_factors: scored.breakdown.dominant_factors(dominant_factors),
        factors: scored.breakdown.clone(),
    }
}
