//! Property tests: edge max-merge monotonicity, counter atomicity.

use chrono::Utc;
use proptest::prelude::*;

use strata_core::capsule::NewCapsule;
use strata_core::models::{EdgeReinforcement, EdgeType};
use strata_core::traits::{ICapsuleStorage, IEdgeStorage};
use strata_storage::StorageEngine;

fn make_pair(engine: &StorageEngine) -> (i64, i64) {
    let ids = engine
        .insert_capsules(
            &[
                (NewCapsule::new(1, "left", "chat"), vec![1.0, 0.0]),
                (NewCapsule::new(1, "right", "chat"), vec![0.0, 1.0]),
            ],
            "m",
        )
        .unwrap();
    (ids[0], ids[1])
}

proptest! {
    #[test]
    fn prop_edge_weight_never_decreases(weights in prop::collection::vec(0.0f64..1.0, 1..12)) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let (a, b) = make_pair(&engine);

        let mut running_max = 0.0f64;
        for (i, w) in weights.iter().enumerate() {
            let edge = engine.upsert_edge(&EdgeReinforcement {
                from: a,
                to: b,
                edge_type: EdgeType::CoRetrieval,
                weight: *w,
                confidence: *w,
                trust: 0.5,
                at: Utc::now(),
            }).unwrap();
            running_max = running_max.max(*w);
            prop_assert!((edge.weight - running_max).abs() < 1e-9);
            prop_assert_eq!(edge.usage_count, i as u64 + 1);
        }
    }

    #[test]
    fn prop_retrieval_count_matches_calls(calls in 0usize..20) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let (a, _) = make_pair(&engine);
        for _ in 0..calls {
            engine.record_retrieval(a, 0.03, Utc::now()).unwrap();
        }
        let capsule = engine.get_capsule(a).unwrap().unwrap();
        prop_assert_eq!(capsule.retrieval_count, calls as u64);
        prop_assert!(capsule.recency_score <= 1.0);
    }
}
