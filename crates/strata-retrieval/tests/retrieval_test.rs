use std::sync::Arc;

use strata_core::capsule::{CapsuleId, MemoryLayer, NewCapsule};
use strata_core::config::{AdmissionConfig, GraphConfig};
use strata_core::models::{AdmissionKind, EdgeType, TraceEventType};
use strata_core::traits::{IActivationStorage, ICapsuleStorage, IEdgeStorage, ITraceSink};
use strata_graph::GraphEngine;
use strata_observability::{InMemoryTraceSink, TraceRecorder};
use strata_retrieval::{RetrievalEngine, SearchRequest};
use strata_scoring::ScoringEngine;
use strata_storage::StorageEngine;
use test_fixtures::{unit_vector, StaticEmbedder};

const DIMS: usize = 8;
const QUERY: &str = "where does the deploy run";

struct Harness {
    store: Arc<StorageEngine>,
    sink: Arc<InMemoryTraceSink>,
    graph: Arc<GraphEngine>,
    engine: RetrievalEngine,
}

fn make_harness_with(embedder: StaticEmbedder, config: AdmissionConfig) -> Harness {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let sink = Arc::new(InMemoryTraceSink::new());
    let graph = Arc::new(GraphEngine::new(
        store.clone(),
        store.clone(),
        GraphConfig::default(),
    ));
    let engine = RetrievalEngine::new(
        store.clone(),
        store.clone(),
        Arc::new(embedder),
        ScoringEngine::default(),
        graph.clone(),
        config,
        TraceRecorder::new(sink.clone()),
    );
    Harness {
        store,
        sink,
        graph,
        engine,
    }
}

fn make_harness() -> Harness {
    make_harness_with(
        StaticEmbedder::new(DIMS).with_vector(QUERY, unit_vector(DIMS, 0)),
        AdmissionConfig::default(),
    )
}

fn insert(h: &Harness, capsule: NewCapsule, axis: usize) -> CapsuleId {
    h.store
        .insert_capsules(&[(capsule, unit_vector(DIMS, axis))], "static-8")
        .unwrap()[0]
}

fn chat(run_id: i64, text: &str, layer: MemoryLayer) -> NewCapsule {
    NewCapsule::new(run_id, text, "chat").with_layer(layer)
}

fn ids(items: &[strata_retrieval::RetrievedItem]) -> Vec<CapsuleId> {
    items.iter().map(|i| i.capsule_id).collect()
}

// ── Ranking and admission ────────────────────────────────────────────────

#[test]
fn best_match_ranks_first_and_counts_retrieval() {
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    let b = insert(&h, chat(1, "lunch is at noon", MemoryLayer::L2Session), 1);
    let c = insert(&h, chat(1, "the office closes early", MemoryLayer::L3Durable), 2);

    let items = h
        .engine
        .search(&SearchRequest::new(QUERY).for_run(1).with_top_k(2))
        .unwrap();
    assert_eq!(ids(&items), vec![a, b]);
    assert_eq!(items[0].admission, AdmissionKind::ScoreAboveThreshold);
    assert_eq!(items[0].dominant_factors[0].factor, "semantic");

    assert_eq!(h.store.get_capsule(a).unwrap().unwrap().retrieval_count, 1);
    assert_eq!(h.store.get_capsule(c).unwrap().unwrap().retrieval_count, 0);
    assert_eq!(h.store.get_state(a).unwrap().unwrap().retrieval_count, 1);

    let activations = h.store.activations_for_run(1, 10).unwrap();
    assert_eq!(activations.len(), 2);
    let top = activations.iter().find(|act| act.capsule_id == a).unwrap();
    assert_eq!(top.query_text, QUERY);
    assert_eq!(top.reason.layer_slot, 1);
    assert_eq!(top.reason.dominant_factors.len(), 3);
}

#[test]
fn cold_capsules_are_never_admitted() {
    let h = make_harness();
    let cold = insert(&h, chat(1, "archived deploy notes", MemoryLayer::L5Cold), 0);
    let hot = insert(&h, chat(1, "scratch deploy notes", MemoryLayer::L0Hot), 1);

    let items = h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
    assert_eq!(ids(&items), vec![hot]);
    assert!(!ids(&items).contains(&cold));
}

#[test]
fn duplicate_text_is_admitted_once() {
    let h = make_harness();
    insert(&h, chat(1, "Deploy on Friday", MemoryLayer::L2Session), 0);
    insert(&h, chat(1, "deploy on   friday", MemoryLayer::L1Short), 0);
    insert(&h, chat(1, "deploy on monday", MemoryLayer::L2Session), 0);

    let items = h.engine.search(&SearchRequest::new(QUERY)).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().any(|i| i.text.contains("monday")));
}

#[test]
fn layer_budget_limits_admission() {
    let h = make_harness();
    for i in 0..5 {
        insert(&h, chat(1, &format!("sparse note {i}"), MemoryLayer::L4Sparse), 0);
    }
    let items = h.engine.search(&SearchRequest::new(QUERY).with_top_k(6)).unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.layer == MemoryLayer::L4Sparse));
}

#[test]
fn strict_threshold_falls_back_to_best_available() {
    let config = AdmissionConfig {
        min_score: 0.99,
        ..AdmissionConfig::default()
    };
    let h = make_harness_with(
        StaticEmbedder::new(DIMS).with_vector(QUERY, unit_vector(DIMS, 0)),
        config,
    );
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    insert(&h, chat(1, "lunch is at noon", MemoryLayer::L2Session), 1);

    let items = h.engine.search(&SearchRequest::new(QUERY)).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].capsule_id, a);
    assert!(items
        .iter()
        .all(|i| i.admission == AdmissionKind::BestAvailableFallback));
}

#[test]
fn source_weights_reorder_results() {
    let h = make_harness();
    let chat_id = insert(&h, NewCapsule::new(1, "note from chat", "chat"), 0);
    let tool_id = insert(&h, NewCapsule::new(1, "note from tool", "tool_output"), 0);

    let boosted_tool = h
        .engine
        .search(&SearchRequest::new(QUERY).with_source_weight("tool_output", 2.0))
        .unwrap();
    assert_eq!(boosted_tool[0].capsule_id, tool_id);
    assert!((boosted_tool[0].breakdown.source_weight - 2.0).abs() < 1e-12);

    let boosted_chat = h
        .engine
        .search(&SearchRequest::new(QUERY).with_source_weight("chat", 2.0))
        .unwrap();
    assert_eq!(boosted_chat[0].capsule_id, chat_id);
}

#[test]
fn zero_top_k_returns_nothing() {
    let h = make_harness();
    insert(&h, chat(1, "deploy notes", MemoryLayer::L2Session), 0);
    assert!(h
        .engine
        .search(&SearchRequest::new(QUERY).with_top_k(0))
        .unwrap()
        .is_empty());
}

#[test]
fn embedding_failure_fails_closed() {
    let h = make_harness_with(StaticEmbedder::failing(DIMS), AdmissionConfig::default());
    insert(&h, chat(1, "deploy notes", MemoryLayer::L2Session), 0);
    assert!(h.engine.search(&SearchRequest::new(QUERY).for_run(1)).is_err());
    assert!(h.store.activations_for_run(1, 10).unwrap().is_empty());
}

// ── Traces ───────────────────────────────────────────────────────────────

#[test]
fn one_admission_event_per_admitted_capsule() {
    let h = make_harness();
    insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    insert(&h, chat(1, "lunch is at noon", MemoryLayer::L0Hot), 1);
    insert(&h, chat(1, "the office closes early", MemoryLayer::L3Durable), 2);

    let items = h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
    let events = h.sink.events_for_run(1, 100).unwrap();
    let count = |t: TraceEventType| events.iter().filter(|e| e.event_type == t).count();
    assert_eq!(count(TraceEventType::MemoryLayerQuery), 1);
    assert_eq!(count(TraceEventType::ContextAdmission), items.len());

    let query_event = events
        .iter()
        .find(|e| e.event_type == TraceEventType::MemoryLayerQuery)
        .unwrap();
    assert_eq!(query_event.payload["admitted"], items.len());
    assert_eq!(query_event.payload["candidates"], 3);
}

// ── Graph ────────────────────────────────────────────────────────────────

#[test]
fn graph_edges_boost_connected_candidates() {
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    let c = insert(&h, chat(1, "blue cluster lives in region west", MemoryLayer::L2Session), 1);
    h.graph.reinforce(a, c, EdgeType::Semantic, 0.9, 0.9, 0.9).unwrap();

    let items = h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
    let linked = items.iter().find(|i| i.capsule_id == c).unwrap();
    assert!(linked.breakdown.graph_boost > 0.0);
    let top = items.iter().find(|i| i.capsule_id == a).unwrap();
    assert_eq!(top.breakdown.graph_boost, 0.0);

    let events = h.sink.events_for_run(1, 100).unwrap();
    assert!(events
        .iter()
        .any(|e| e.event_type == TraceEventType::GraphRerank));
}

#[test]
fn associated_capsules_surface_from_outside_the_pool() {
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    let other_run = insert(&h, chat(2, "blue cluster runbook", MemoryLayer::L3Durable), 3);
    let archived = insert(&h, chat(2, "old blue cluster runbook", MemoryLayer::L5Cold), 4);
    h.graph.reinforce(a, other_run, EdgeType::Semantic, 1.0, 1.0, 1.0).unwrap();
    h.graph.reinforce(a, archived, EdgeType::Semantic, 1.0, 1.0, 1.0).unwrap();

    let items = h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
    let surfaced = items.iter().find(|i| i.capsule_id == other_run).unwrap();
    assert_eq!(surfaced.admission, AdmissionKind::GraphAssociation);
    assert!(surfaced.score > 0.0);
    assert!(!ids(&items).contains(&archived));
}

#[test]
fn admitted_capsules_are_reinforced_together() {
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    let b = insert(&h, chat(1, "lunch is at noon", MemoryLayer::L2Session), 1);

    h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
    let edges = h.store.edges_for(a).unwrap();
    let linked = |from: CapsuleId, to: CapsuleId| {
        edges.iter().any(|e| {
            e.edge_type == EdgeType::CoRetrieval
                && e.from_capsule_id == from
                && e.to_capsule_id == to
        })
    };
    assert!(linked(a, b));
    assert!(linked(b, a));
}

// ── Plain search ─────────────────────────────────────────────────────────

#[test]
fn plain_search_is_read_only() {
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);
    insert(&h, chat(1, "lunch is at noon", MemoryLayer::L2Session), 1);

    let matches = h.engine.search_capsules(QUERY, None, 5).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].capsule_id, a);
    assert!((matches[0].score - 1.0).abs() < 1e-6);
    assert_eq!(matches[1].score, 0.0);

    assert_eq!(h.store.get_capsule(a).unwrap().unwrap().retrieval_count, 0);
    assert!(h.store.activations_for_run(1, 10).unwrap().is_empty());
    assert_eq!(h.store.edge_count().unwrap(), 0);
}

#[test]
fn concurrent_searches_count_every_retrieval() {
    const THREADS: u64 = 8;
    const SEARCHES: u64 = 25;
    let h = make_harness();
    let a = insert(&h, chat(1, "deploy runs on the blue cluster", MemoryLayer::L2Session), 0);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for _ in 0..SEARCHES {
                    let items = h.engine.search(&SearchRequest::new(QUERY).for_run(1)).unwrap();
                    assert_eq!(ids(&items), vec![a]);
                }
            });
        }
    });

    let expected = THREADS * SEARCHES;
    assert_eq!(h.store.get_capsule(a).unwrap().unwrap().retrieval_count, expected);
    assert_eq!(h.store.get_state(a).unwrap().unwrap().retrieval_count, expected);
    assert_eq!(
        h.store.activations_for_run(1, 1000).unwrap().len(),
        expected as usize
    );
}
