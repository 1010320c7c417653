//! Structured log events for key operations.

use strata_core::capsule::{CapsuleId, MemoryLayer};

pub fn capsules_ingested(run_id: i64, source: &str, created: usize) {
    tracing::info!(
        event = "capsules_ingested",
        run_id,
        source = %source,
        created,
        "capsules ingested"
    );
}

pub fn context_admitted(run_id: Option<i64>, candidates: usize, admitted: usize) {
    tracing::info!(
        event = "context_admitted",
        run_id = ?run_id,
        candidates,
        admitted,
        "context admitted"
    );
}

pub fn capsule_transitioned(id: CapsuleId, from: MemoryLayer, to: MemoryLayer, kind: &str) {
    tracing::debug!(
        event = "capsule_transitioned",
        capsule_id = id,
        from = %from,
        to = %to,
        kind = %kind,
        "capsule changed layer"
    );
}

pub fn conflict_detected(left: CapsuleId, right: CapsuleId, score: f64) {
    tracing::warn!(
        event = "conflict_detected",
        left,
        right,
        score,
        "contradiction detected"
    );
}

pub fn worker_fallback(job_type: &str, reason: &str) {
    tracing::warn!(
        event = "worker_fallback",
        job_type = %job_type,
        reason = %reason,
        "worker unavailable, running locally"
    );
}

pub fn maintenance_finished(job_id: i64, status: &str, scanned: usize, errors: usize) {
    tracing::info!(
        event = "maintenance_finished",
        job_id,
        status = %status,
        scanned,
        errors,
        "maintenance sweep finished"
    );
}
