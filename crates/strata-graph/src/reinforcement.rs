//! Co-retrieval growth: the top admitted capsules reinforce each other.

use chrono::{DateTime, Utc};

use strata_core::capsule::CapsuleId;
use strata_core::config::GraphConfig;
use strata_core::models::{EdgeReinforcement, EdgeType};

/// Pairwise `co_retrieval` reinforcements among the first `co_retrieval_fan`
/// admitted ids, in both directions. Repeated ids are skipped.
pub fn co_retrieval_pairs(
    admitted: &[CapsuleId],
    config: &GraphConfig,
    at: DateTime<Utc>,
) -> Vec<EdgeReinforcement> {
    let mut top: Vec<CapsuleId> = Vec::with_capacity(config.co_retrieval_fan);
    for id in admitted {
        if top.len() == config.co_retrieval_fan {
            break;
        }
        if !top.contains(id) {
            top.push(*id);
        }
    }

    let mut out = Vec::new();
    for (i, &a) in top.iter().enumerate() {
        for &b in &top[i + 1..] {
            for (from, to) in [(a, b), (b, a)] {
                out.push(EdgeReinforcement {
                    from,
                    to,
                    edge_type: EdgeType::CoRetrieval,
                    weight: config.co_retrieval_weight,
                    confidence: config.co_retrieval_confidence,
                    trust: config.co_retrieval_trust,
                    at,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_limits_pairs() {
        let pairs = co_retrieval_pairs(&[1, 2, 3, 4, 5, 6], &GraphConfig::default(), Utc::now());
        // C(4, 2) pairs, both directions.
        assert_eq!(pairs.len(), 12);
        assert!(pairs.iter().all(|p| p.from <= 4 && p.to <= 4 && p.from != p.to));
    }

    #[test]
    fn single_admission_reinforces_nothing() {
        assert!(co_retrieval_pairs(&[7], &GraphConfig::default(), Utc::now()).is_empty());
        assert!(co_retrieval_pairs(&[7, 7], &GraphConfig::default(), Utc::now()).is_empty());
    }
}
