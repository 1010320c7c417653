//! Health report over a real in-memory store.

use chrono::Utc;

use strata_core::capsule::{MemoryLayer, NewCapsule};
use strata_core::models::{EdgeReinforcement, EdgeType, JobStatus};
use strata_core::traits::{ICapsuleStorage, IConflictStorage, IEdgeStorage, IJobStorage};
use strata_observability::{HealthReporter, HealthStatus};
use strata_storage::StorageEngine;

fn make_store() -> (StorageEngine, Vec<i64>) {
    let store = StorageEngine::open_in_memory().unwrap();
    let ids = store
        .insert_capsules(
            &[
                (NewCapsule::new(1, "hot", "tool").with_layer(MemoryLayer::L0Hot), vec![1.0]),
                (NewCapsule::new(1, "short", "chat").with_layer(MemoryLayer::L1Short), vec![1.0]),
                (
                    NewCapsule::new(1, "cold", "attachment").with_layer(MemoryLayer::L5Cold),
                    vec![1.0],
                ),
                (NewCapsule::new(1, "same text", "chat"), vec![1.0]),
            ],
            "m",
        )
        .unwrap();
    (store, ids)
}

#[test]
fn report_counts_layers_and_structures() {
    let (store, ids) = make_store();
    store
        .upsert_edge(&EdgeReinforcement {
            from: ids[0],
            to: ids[1],
            edge_type: EdgeType::CoRetrieval,
            weight: 0.65,
            confidence: 0.65,
            trust: 0.5,
            at: Utc::now(),
        })
        .unwrap();
    store.join_duplicate_cluster("h1", ids[3]).unwrap();
    store.join_duplicate_cluster("h1", ids[1]).unwrap();
    store.join_duplicate_cluster("h2", ids[2]).unwrap();
    store
        .upsert_conflict(ids[0], ids[3], 0.7, &serde_json::json!({}))
        .unwrap();

    let report = HealthReporter::collect(&store, 10).unwrap();
    assert_eq!(report.total_capsules, 4);
    assert_eq!(report.hot_count, 2);
    assert_eq!(report.cold_count, 1);
    assert_eq!(report.layer_counts["L2_SESSION"], 1);
    assert_eq!(report.layer_counts.len(), 6);
    assert_eq!(report.edge_count, 1);
    assert_eq!(report.conflict_count, 1);
    assert_eq!(report.duplicate_cluster_count, 1);
    assert_eq!(report.status, HealthStatus::Healthy);
}

#[test]
fn failed_latest_job_degrades_status() {
    let (store, _) = make_store();
    let mut job = store.create_maintenance_job(None, "memory_maintenance").unwrap();
    job.status = JobStatus::Failed;
    store.finish_maintenance_job(&job).unwrap();

    let report = HealthReporter::collect(&store, 10).unwrap();
    assert_eq!(report.status, HealthStatus::Degraded);
    assert_eq!(report.recent_jobs.len(), 1);
}
