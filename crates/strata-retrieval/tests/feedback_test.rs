use std::sync::Arc;

use strata_core::capsule::{CapsuleId, NewCapsule};
use strata_core::models::TraceEventType;
use strata_core::traits::{IActivationStorage, ICapsuleStorage, ITraceSink};
use strata_observability::{InMemoryTraceSink, TraceRecorder};
use strata_retrieval::{FeedbackRecorder, FeedbackRequest};
use strata_storage::StorageEngine;
use test_fixtures::unit_vector;

fn make_recorder() -> (Arc<StorageEngine>, Arc<InMemoryTraceSink>, FeedbackRecorder) {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let sink = Arc::new(InMemoryTraceSink::new());
    let recorder = FeedbackRecorder::new(
        store.clone(),
        store.clone(),
        TraceRecorder::new(sink.clone()),
    );
    (store, sink, recorder)
}

fn insert(store: &StorageEngine, text: &str) -> CapsuleId {
    store
        .insert_capsules(&[(NewCapsule::new(1, text, "chat"), unit_vector(4, 0))], "static-4")
        .unwrap()[0]
}

#[test]
fn used_and_unused_capsules_move_in_opposite_directions() {
    let (store, sink, recorder) = make_recorder();
    let used = insert(&store, "the answer came from here");
    let ignored = insert(&store, "this one was not needed");

    let metrics = recorder
        .record(&FeedbackRequest {
            run_id: 1,
            retrieved_ids: vec![used, ignored],
            used_ids: vec![used],
            helped_final_answer: true,
            helped_tool_execution: true,
        })
        .unwrap();
    assert_eq!(metrics.len(), 2);

    let used_capsule = store.get_capsule(used).unwrap().unwrap();
    assert_eq!(used_capsule.success_count, 1);
    assert!((used_capsule.trust_score - 0.52).abs() < 1e-9);
    assert!(used_capsule.last_used_at.is_some());
    // gain 0.1 lifts consolidation by 0.004
    assert!((used_capsule.consolidation_score - 0.504).abs() < 1e-9);

    let ignored_capsule = store.get_capsule(ignored).unwrap().unwrap();
    assert_eq!(ignored_capsule.failure_count, 1);
    assert!((ignored_capsule.trust_score - 0.49).abs() < 1e-9);
    assert!(ignored_capsule.consolidation_score < 0.5);

    let used_metric = store.get_usefulness(1, used).unwrap().unwrap();
    assert_eq!((used_metric.retrieved_count, used_metric.used_count), (1, 1));
    assert!((used_metric.helped_final_answer_score - 0.1).abs() < 1e-9);
    assert!((used_metric.helped_tool_execution_score - 0.08).abs() < 1e-9);

    let ignored_metric = store.get_usefulness(1, ignored).unwrap().unwrap();
    assert_eq!(ignored_metric.unused_count, 1);
    assert!((ignored_metric.stale_penalty - 0.03).abs() < 1e-9);
    assert!((ignored_metric.confidence_gain + 0.03).abs() < 1e-9);

    let events = sink.events_for_run(1, 10).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, TraceEventType::MemoryUsefulnessUpdate);
}

#[test]
fn metrics_accumulate_across_calls() {
    let (store, _sink, recorder) = make_recorder();
    let id = insert(&store, "sometimes useful");
    let request = FeedbackRequest {
        run_id: 1,
        retrieved_ids: vec![id],
        used_ids: vec![],
        ..Default::default()
    };
    recorder.record(&request).unwrap();
    recorder.record(&request).unwrap();

    let metric = store.get_usefulness(1, id).unwrap().unwrap();
    assert_eq!(metric.retrieved_count, 2);
    assert_eq!(metric.unused_count, 2);
    assert!((metric.stale_penalty - 0.06).abs() < 1e-9);
    assert_eq!(store.get_capsule(id).unwrap().unwrap().failure_count, 2);
}

#[test]
fn contradicted_capsules_carry_a_penalty() {
    let (store, _sink, recorder) = make_recorder();
    let id = insert(&store, "disputed claim");
    store.set_contradiction_flag(id, true).unwrap();

    recorder
        .record(&FeedbackRequest {
            run_id: 1,
            retrieved_ids: vec![id],
            used_ids: vec![id],
            helped_final_answer: true,
            helped_tool_execution: false,
        })
        .unwrap();
    let metric = store.get_usefulness(1, id).unwrap().unwrap();
    assert!((metric.contradiction_penalty - 0.08).abs() < 1e-9);
    assert!((metric.confidence_gain - 0.02).abs() < 1e-9);
}

#[test]
fn unknown_and_repeated_ids_are_skipped() {
    let (store, _sink, recorder) = make_recorder();
    let id = insert(&store, "real capsule");
    let metrics = recorder
        .record(&FeedbackRequest {
            run_id: 3,
            retrieved_ids: vec![id, 9_999, id],
            used_ids: vec![id],
            ..Default::default()
        })
        .unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(store.get_capsule(id).unwrap().unwrap().success_count, 1);
}
