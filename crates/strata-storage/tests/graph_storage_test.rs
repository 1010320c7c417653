//! Edge upsert/prune, conflicts, duplicate clusters, activations, jobs, traces.

use chrono::Utc;
use serde_json::json;

use strata_core::capsule::{MemoryLayer, NewCapsule};
use strata_core::errors::{GraphError, StrataError};
use strata_core::models::{
    AdmissionKind, AdmissionReason, ContextActivation, DispatchStatus, EdgeReinforcement,
    EdgeType, JobStatus, MemoryUsefulnessMetric, NewTraceEvent, ScoreBreakdown, TraceEventType,
    WorkerRequest,
};
use strata_core::traits::{
    IActivationStorage, ICapsuleStorage, IConflictStorage, IEdgeStorage, IJobStorage, ITraceSink,
};
use strata_storage::StorageEngine;

fn make_engine_with(n: usize) -> (StorageEngine, Vec<i64>) {
    let engine = StorageEngine::open_in_memory().unwrap();
    let batch: Vec<_> = (0..n)
        .map(|i| (NewCapsule::new(1, format!("capsule {i}"), "chat"), vec![1.0, 0.0]))
        .collect();
    let ids = engine.insert_capsules(&batch, "m").unwrap();
    (engine, ids)
}

fn make_reinforcement(from: i64, to: i64, weight: f64) -> EdgeReinforcement {
    EdgeReinforcement {
        from,
        to,
        edge_type: EdgeType::CoRetrieval,
        weight,
        confidence: 0.65,
        trust: 0.5,
        at: Utc::now(),
    }
}

// ── Edges ─────────────────────────────────────────────────────────────────

#[test]
fn first_upsert_has_usage_one() {
    let (engine, ids) = make_engine_with(2);
    let edge = engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.4))
        .unwrap();
    assert_eq!(edge.usage_count, 1);
    assert_eq!(edge.edge_type, EdgeType::CoRetrieval);
}

#[test]
fn repeated_upsert_max_merges_and_counts_usage() {
    let (engine, ids) = make_engine_with(2);
    engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.7))
        .unwrap();
    let edge = engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.3))
        .unwrap();
    assert_eq!(edge.usage_count, 2);
    assert!((edge.weight - 0.7).abs() < 1e-9);
    assert_eq!(engine.edge_count().unwrap(), 1);
}

#[test]
fn edge_types_coexist_on_one_pair() {
    let (engine, ids) = make_engine_with(2);
    engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.5))
        .unwrap();
    let mut semantic = make_reinforcement(ids[0], ids[1], 0.5);
    semantic.edge_type = EdgeType::Semantic;
    engine.upsert_edge(&semantic).unwrap();
    assert_eq!(engine.edge_count().unwrap(), 2);
}

#[test]
fn self_edge_is_rejected() {
    let (engine, ids) = make_engine_with(1);
    let err = engine
        .upsert_edge(&make_reinforcement(ids[0], ids[0], 0.5))
        .unwrap_err();
    assert!(matches!(
        err,
        StrataError::GraphError(GraphError::InvalidEdge { .. })
    ));
}

#[test]
fn edges_touching_reports_each_edge_once() {
    let (engine, ids) = make_engine_with(3);
    engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.5))
        .unwrap();
    engine
        .upsert_edge(&make_reinforcement(ids[1], ids[2], 0.5))
        .unwrap();
    let touching = engine.edges_touching(&[ids[0], ids[1]]).unwrap();
    assert_eq!(touching.len(), 2);
    assert!(engine.edges_touching(&[]).unwrap().is_empty());
}

#[test]
fn edges_for_orders_heaviest_first() {
    let (engine, ids) = make_engine_with(3);
    engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.2))
        .unwrap();
    engine
        .upsert_edge(&make_reinforcement(ids[2], ids[0], 0.9))
        .unwrap();
    let edges = engine.edges_for(ids[0]).unwrap();
    assert_eq!(edges[0].other_end(ids[0]), Some(ids[2]));
}

#[test]
fn prune_removes_only_light_rarely_used_edges() {
    let (engine, ids) = make_engine_with(4);
    // Light and used once: pruned.
    engine
        .upsert_edge(&make_reinforcement(ids[0], ids[1], 0.1))
        .unwrap();
    // Light but used twice: kept.
    engine
        .upsert_edge(&make_reinforcement(ids[1], ids[2], 0.1))
        .unwrap();
    engine
        .upsert_edge(&make_reinforcement(ids[1], ids[2], 0.1))
        .unwrap();
    // Heavy: kept.
    engine
        .upsert_edge(&make_reinforcement(ids[2], ids[3], 0.6))
        .unwrap();

    assert_eq!(engine.prune_edges(0.18, 2).unwrap(), 1);
    assert_eq!(engine.edge_count().unwrap(), 2);
}

// ── Conflicts and duplicates ──────────────────────────────────────────────

#[test]
fn conflict_upsert_keeps_highest_score() {
    let (engine, ids) = make_engine_with(2);
    engine
        .upsert_conflict(ids[0], ids[1], 0.7, &json!({"jaccard": 0.5}))
        .unwrap();
    let conflict = engine
        .upsert_conflict(ids[0], ids[1], 0.6, &json!({"jaccard": 0.4}))
        .unwrap();
    assert!((conflict.conflict_score - 0.7).abs() < 1e-9);
    assert_eq!(conflict.detail["jaccard"], json!(0.5));
    assert_eq!(engine.conflict_count().unwrap(), 1);
    assert_eq!(engine.list_conflicts(100).unwrap().len(), 1);
}

#[test]
fn duplicate_cluster_grows_and_never_shrinks() {
    let (engine, ids) = make_engine_with(3);
    let first = engine.join_duplicate_cluster("abc123", ids[0]).unwrap();
    assert_eq!(first.cluster_size, 1);
    assert_eq!(first.canonical_capsule_id, ids[0]);

    engine.join_duplicate_cluster("abc123", ids[1]).unwrap();
    let again = engine.join_duplicate_cluster("abc123", ids[1]).unwrap();
    assert_eq!(again.cluster_size, 2);
    assert_eq!(again.member_ids, vec![ids[0], ids[1]]);

    assert_eq!(engine.list_duplicate_clusters(2).unwrap().len(), 1);
    engine.join_duplicate_cluster("other", ids[2]).unwrap();
    assert_eq!(engine.list_duplicate_clusters(1).unwrap().len(), 2);
}

// ── Activations and usefulness ────────────────────────────────────────────

#[test]
fn activation_reason_roundtrips() {
    let (engine, ids) = make_engine_with(1);
    let activation = ContextActivation {
        id: 0,
        run_id: Some(42),
        capsule_id: ids[0],
        query_text: "deploy steps".to_string(),
        score: 0.61,
        layer: MemoryLayer::L2Session,
        reason: AdmissionReason {
            admission: AdmissionKind::ScoreAboveThreshold,
            layer_budget: 4,
            layer_slot: 1,
            rank_score: 0.61,
            dominant_factors: Vec::new(),
            factors: ScoreBreakdown::default(),
        },
        created_at: Utc::now(),
    };
    engine.insert_activation(&activation).unwrap();

    let stored = engine.activations_for_run(42, 10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].reason.layer_budget, 4);
    assert_eq!(engine.runs_with_activations().unwrap(), 1);
}

#[test]
fn usefulness_upsert_replaces_row() {
    let (engine, ids) = make_engine_with(1);
    let mut metric = MemoryUsefulnessMetric::empty(9, ids[0], Utc::now());
    metric.used_count = 1;
    engine.upsert_usefulness(&metric).unwrap();
    metric.used_count = 2;
    engine.upsert_usefulness(&metric).unwrap();
    assert_eq!(
        engine.get_usefulness(9, ids[0]).unwrap().unwrap().used_count,
        2
    );
    assert!(engine.get_usefulness(10, ids[0]).unwrap().is_none());
}

// ── Jobs and workers ──────────────────────────────────────────────────────

#[test]
fn maintenance_job_lifecycle() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut job = engine
        .create_maintenance_job(Some(3), "memory_maintenance")
        .unwrap();
    assert_eq!(job.status, JobStatus::Running);

    job.status = JobStatus::Done;
    job.details.promoted = 2;
    job.finished_at = Some(Utc::now());
    engine.finish_maintenance_job(&job).unwrap();

    let recent = engine.recent_maintenance_jobs(5).unwrap();
    assert_eq!(recent[0].status, JobStatus::Done);
    assert_eq!(recent[0].details.promoted, 2);
}

#[test]
fn worker_job_records_fallback() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut job = engine
        .insert_worker_job(&WorkerRequest {
            job_type: "memory_maintenance".to_string(),
            payload: json!({"run_id": 1}),
            priority: 4,
        })
        .unwrap();
    job.status = DispatchStatus::FallbackLocal;
    job.used_fallback_local = true;
    job.error = Some("no workers".to_string());
    engine.finish_worker_job(&job).unwrap();

    let stored = &engine.recent_worker_jobs(1).unwrap()[0];
    assert_eq!(stored.status, DispatchStatus::FallbackLocal);
    assert!(stored.used_fallback_local);
}

#[test]
fn worker_registration_is_idempotent_by_name() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .register_worker("w1", "http://a:9000", &["memory_maintenance".to_string()])
        .unwrap();
    let node = engine.register_worker("w1", "http://b:9000", &[]).unwrap();
    assert_eq!(node.url, "http://b:9000");
    assert_eq!(engine.list_workers().unwrap().len(), 1);
}

// ── Trace log ─────────────────────────────────────────────────────────────

#[test]
fn trace_events_come_back_oldest_first() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for event_type in [TraceEventType::MemoryLayerQuery, TraceEventType::ContextAdmission] {
        engine
            .append(&NewTraceEvent {
                run_id: Some(1),
                event_type,
                payload: json!({}),
                created_at: Utc::now(),
            })
            .unwrap();
    }
    let events = engine.events_for_run(1, 10).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, TraceEventType::MemoryLayerQuery);
    assert!(engine.events_for_run(2, 10).unwrap().is_empty());
}
