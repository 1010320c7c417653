//! Property tests for admission: no cold capsules, no duplicate text,
//! layer budgets and the global cap always hold.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use strata_core::capsule::{MemoryLayer, NewCapsule};
use strata_core::config::{AdmissionConfig, GraphConfig};
use strata_core::traits::ICapsuleStorage;
use strata_graph::GraphEngine;
use strata_observability::{InMemoryTraceSink, TraceRecorder};
use strata_retrieval::{RetrievalEngine, SearchRequest};
use strata_scoring::ScoringEngine;
use strata_storage::StorageEngine;
use strata_validation::canonical::normalize_text;
use test_fixtures::{unit_vector, StaticEmbedder};

const DIMS: usize = 6;
const WORDS: [&str; 4] = ["deploy", "Deploy", "cache", "rollback"];

fn layer_strategy() -> impl Strategy<Value = MemoryLayer> {
    (0usize..6).prop_map(|i| MemoryLayer::ALL[i])
}

fn capsule_strategy() -> impl Strategy<Value = (MemoryLayer, usize, usize, usize)> {
    (layer_strategy(), 0usize..DIMS, 0usize..WORDS.len(), 0usize..3)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn admission_invariants_hold(
        capsules in prop::collection::vec(capsule_strategy(), 1..24),
        top_k in 1usize..10,
    ) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let rows: Vec<_> = capsules
            .iter()
            .map(|(layer, axis, word, suffix)| {
                let text = format!("{} note {}", WORDS[*word], suffix);
                (NewCapsule::new(1, text, "chat").with_layer(*layer), unit_vector(DIMS, *axis))
            })
            .collect();
        store.insert_capsules(&rows, "static-6").unwrap();

        let config = AdmissionConfig::default();
        let graph = Arc::new(GraphEngine::new(
            store.clone(),
            store.clone(),
            GraphConfig::default(),
        ));
        let engine = RetrievalEngine::new(
            store.clone(),
            store.clone(),
            Arc::new(StaticEmbedder::new(DIMS).with_vector("q", unit_vector(DIMS, 0))),
            ScoringEngine::default(),
            graph,
            config.clone(),
            TraceRecorder::new(Arc::new(InMemoryTraceSink::new())),
        );

        let items = engine.search(&SearchRequest::new("q").with_top_k(top_k)).unwrap();

        prop_assert!(items.len() <= top_k.min(config.max_active_contexts));
        prop_assert!(items.iter().all(|i| i.layer != MemoryLayer::L5Cold));

        let mut texts = HashSet::new();
        for item in &items {
            prop_assert!(texts.insert(normalize_text(&item.text)));
        }

        let mut per_layer: HashMap<MemoryLayer, usize> = HashMap::new();
        for item in &items {
            *per_layer.entry(item.layer).or_insert(0) += 1;
        }
        for (layer, count) in per_layer {
            prop_assert!(count <= config.layer_budget(layer));
        }

        for pair in items.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].layer <= pair[1].layer)
            );
        }

        let hot_available = capsules.iter().any(|(l, ..)| *l != MemoryLayer::L5Cold);
        prop_assert_eq!(items.is_empty(), !hot_available);
    }
}
