use std::sync::Arc;

use serde_json::json;

use strata_core::errors::WorkerError;
use strata_core::models::{DispatchStatus, TraceEventType};
use strata_core::traits::{IJobStorage, ITraceSink};
use strata_observability::{InMemoryTraceSink, TraceRecorder};
use strata_storage::StorageEngine;
use strata_workers::{NoWorkers, WorkerDispatcher, WorkerRegistry};
use test_fixtures::ScriptedTransport;

fn make_store() -> Arc<StorageEngine> {
    Arc::new(StorageEngine::open_in_memory().unwrap())
}

// ── Dispatch outcomes ────────────────────────────────────────────────────

#[test]
fn no_workers_falls_back_locally() {
    let store = make_store();
    let dispatcher = WorkerDispatcher::new(Arc::new(NoWorkers), store.clone());

    let outcome = dispatcher
        .dispatch("memory_maintenance", json!({ "run_id": 3 }), 4)
        .unwrap();
    assert_eq!(outcome.status, DispatchStatus::FallbackLocal);
    assert!(outcome.used_fallback_local);
    assert_eq!(outcome.result, Some(json!({ "mode": "local" })));

    let jobs = store.recent_worker_jobs(5).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status, DispatchStatus::FallbackLocal);
    assert_eq!(jobs[0].priority, 4);
    assert!(jobs[0].finished_at.is_some());
}

#[test]
fn timeout_is_recovered_not_raised() {
    let store = make_store();
    let transport = Arc::new(ScriptedTransport::always_timeout(1));
    let dispatcher = WorkerDispatcher::new(transport.clone(), store.clone());

    let outcome = dispatcher.dispatch("memory_maintenance", json!({}), 4).unwrap();
    assert_eq!(outcome.status, DispatchStatus::FallbackLocal);
    assert!(outcome.error.unwrap().contains("timed out"));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.requests()[0].job_type, "memory_maintenance");
}

#[test]
fn rejected_job_is_marked_failed() {
    let store = make_store();
    let transport = Arc::new(ScriptedTransport::new(vec![Err(WorkerError::Rejected {
        status: 503,
        body: "busy".to_string(),
    }
    .into())]));
    let dispatcher = WorkerDispatcher::new(transport, store.clone());

    let outcome = dispatcher.dispatch("memory_maintenance", json!({}), 4).unwrap();
    assert_eq!(outcome.status, DispatchStatus::Failed);
    assert!(outcome.used_fallback_local);
    assert_eq!(store.recent_worker_jobs(1).unwrap()[0].status, DispatchStatus::Failed);
}

#[test]
fn worker_success_is_done() {
    let store = make_store();
    let sink = Arc::new(InMemoryTraceSink::new());
    let transport = Arc::new(ScriptedTransport::always_ok(json!({ "scanned": 12 }), 1));
    let dispatcher = WorkerDispatcher::new(transport, store.clone())
        .with_recorder(TraceRecorder::new(sink.clone()));

    let outcome = dispatcher
        .dispatch("memory_maintenance", json!({ "run_id": 7 }), 4)
        .unwrap();
    assert_eq!(outcome.status, DispatchStatus::Done);
    assert!(!outcome.used_fallback_local);
    assert_eq!(outcome.result, Some(json!({ "scanned": 12 })));

    let events = sink.events_for_run(7, 10).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, TraceEventType::WorkerDispatch);
    assert_eq!(events[0].payload["status"], "done");
}

// ── Registry ─────────────────────────────────────────────────────────────

#[test]
fn registry_round_trips_nodes() {
    let store = make_store();
    let registry = WorkerRegistry::new(store);
    registry
        .register("gpu-1", "http://gpu-1:8000/", &["memory_maintenance".to_string()])
        .unwrap();
    registry.register("cpu-1", "http://cpu-1:8000", &[]).unwrap();

    let nodes = registry.list().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].name, "gpu-1");
    assert_eq!(nodes[0].url, "http://gpu-1:8000");
    assert_eq!(nodes[0].capabilities, vec!["memory_maintenance".to_string()]);
}

#[test]
fn registry_rejects_blank_fields() {
    let registry = WorkerRegistry::new(make_store());
    assert!(registry.register(" ", "http://x", &[]).is_err());
    assert!(registry.register("x", "", &[]).is_err());
}
