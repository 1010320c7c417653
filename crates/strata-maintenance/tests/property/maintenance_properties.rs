//! Property tests for lifecycle transitions: one tier per pass, and the
//! archive status always agrees with the layer.

use std::sync::Arc;

use chrono::{Duration, Utc};
use proptest::prelude::*;

use strata_core::capsule::{ArchiveStatus, MemoryLayer};
use strata_core::config::{GraphConfig, MaintenanceConfig, ValidationConfig};
use strata_core::models::FeedbackDelta;
use strata_core::traits::ICapsuleStorage;
use strata_graph::GraphEngine;
use strata_maintenance::transitions;
use strata_maintenance::{CancellationToken, MaintenanceEngine};
use strata_observability::{InMemoryTraceSink, TraceRecorder};
use strata_storage::StorageEngine;
use strata_validation::ValidationEngine;
use test_fixtures::{make_capsule_at, make_new_capsule, unit_vector, StaticEmbedder};

fn layer_strategy() -> impl Strategy<Value = MemoryLayer> {
    (0usize..6).prop_map(|i| MemoryLayer::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn planned_transitions_are_single_step(
        layer in layer_strategy(),
        utility in -1.0f64..1.5,
        age_days in 0i64..90,
    ) {
        let now = Utc::now();
        let capsule = make_capsule_at(1, "x", layer, now - Duration::days(age_days));
        if let Some(t) = transitions::plan(&capsule, utility, &MaintenanceConfig::default(), now) {
            prop_assert_eq!(t.from, layer);
            prop_assert_eq!(t.from.distance(t.to), 1);
            prop_assert_eq!(t.archive_status() == ArchiveStatus::Cold, t.to == MemoryLayer::L5Cold);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn sweep_moves_each_capsule_at_most_one_tier(
        capsules in prop::collection::vec(
            (layer_strategy(), 0u64..4, 0u64..4, any::<bool>()),
            1..12,
        ),
    ) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let recorder = TraceRecorder::new(Arc::new(InMemoryTraceSink::new()));
        let graph = Arc::new(GraphEngine::new(
            store.clone(),
            store.clone(),
            GraphConfig::default(),
        ));
        let validation = Arc::new(ValidationEngine::new(
            store.clone(),
            store.clone(),
            ValidationConfig::default(),
        ));
        let engine = MaintenanceEngine::new(
            store.clone(),
            Arc::new(StaticEmbedder::new(8)),
            graph,
            validation,
            recorder,
            MaintenanceConfig::default(),
        );

        let mut before = Vec::new();
        for (i, (layer, success, failure, old)) in capsules.iter().enumerate() {
            let mut capsule =
                make_new_capsule(1, &format!("capsule {i} about topic {i}")).with_layer(*layer);
            if *old {
                capsule = capsule.with_created_at(Utc::now() - Duration::days(60));
            }
            let id = store.insert_capsules(&[(capsule, unit_vector(8, i))], "static-8").unwrap()[0];
            let delta = FeedbackDelta {
                success: *success,
                failure: *failure,
                trust: 0.0,
                consolidation: 0.0,
            };
            store.apply_feedback(id, &delta, Utc::now()).unwrap();
            before.push((id, *layer));
        }

        engine.run_maintenance(Some(1), false, &CancellationToken::new()).unwrap();

        for (id, layer) in before {
            let after = store.get_capsule(id).unwrap().unwrap();
            prop_assert!(layer.distance(after.layer) <= 1);
            prop_assert_eq!(
                after.archive_status == ArchiveStatus::Cold,
                after.layer == MemoryLayer::L5Cold
            );
        }
    }
}
