//! Threshold, band, and rank orderings over scored candidates.

use std::cmp::Ordering;

use strata_core::models::AdmissionKind;
use strata_scoring::ScoredCapsule;

/// Keep candidates at or above `min_score`. When none pass, keep all of them
/// and report the fallback so callers never starve on a strict threshold.
pub fn apply_threshold(
    scored: Vec<ScoredCapsule>,
    min_score: f64,
) -> (Vec<ScoredCapsule>, AdmissionKind) {
    let passed: Vec<ScoredCapsule> = scored
        .iter()
        .filter(|s| s.score >= min_score)
        .cloned()
        .collect();
    if passed.is_empty() {
        (scored, AdmissionKind::BestAvailableFallback)
    } else {
        (passed, AdmissionKind::ScoreAboveThreshold)
    }
}

/// Hotter layer first, then higher score, then lower id.
pub fn by_layer_then_score(a: &ScoredCapsule, b: &ScoredCapsule) -> Ordering {
    a.capsule
        .layer
        .cmp(&b.capsule.layer)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.capsule.id.cmp(&b.capsule.id))
}

/// Higher score first; hotter layer breaks ties, then lower id.
pub fn by_score_then_layer(a: &ScoredCapsule, b: &ScoredCapsule) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.capsule.layer.cmp(&b.capsule.layer))
        .then_with(|| a.capsule.id.cmp(&b.capsule.id))
}

/// The first `size` candidates in layer order.
pub fn band(mut candidates: Vec<ScoredCapsule>, size: usize) -> Vec<ScoredCapsule> {
    candidates.sort_by(by_layer_then_score);
    candidates.truncate(size);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::capsule::MemoryLayer;
    use strata_core::models::ScoreBreakdown;
    use test_fixtures::make_capsule;

    fn scored(id: i64, layer: MemoryLayer, score: f64) -> ScoredCapsule {
        ScoredCapsule {
            capsule: make_capsule(id, &format!("capsule {id}"), layer),
            score,
            breakdown: ScoreBreakdown::default(),
        }
    }

    #[test]
    fn threshold_falls_back_to_everything() {
        let (kept, kind) = apply_threshold(vec![scored(1, MemoryLayer::L2Session, 0.05)], 0.1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kind, AdmissionKind::BestAvailableFallback);

        let (kept, kind) = apply_threshold(
            vec![
                scored(1, MemoryLayer::L2Session, 0.05),
                scored(2, MemoryLayer::L2Session, 0.4),
            ],
            0.1,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kind, AdmissionKind::ScoreAboveThreshold);
    }

    #[test]
    fn band_prefers_hot_layers() {
        let banded = band(
            vec![
                scored(1, MemoryLayer::L3Durable, 0.9),
                scored(2, MemoryLayer::L0Hot, 0.2),
                scored(3, MemoryLayer::L1Short, 0.5),
            ],
            2,
        );
        assert_eq!(banded.iter().map(|s| s.capsule.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn equal_scores_rank_hot_first() {
        let mut list = vec![
            scored(1, MemoryLayer::L4Sparse, 0.5),
            scored(2, MemoryLayer::L0Hot, 0.5),
        ];
        list.sort_by(by_score_then_layer);
        assert_eq!(list[0].capsule.id, 2);
    }
}
