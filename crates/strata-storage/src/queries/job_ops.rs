//! Maintenance jobs, worker jobs, and the worker registry.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use strata_core::capsule::RunId;
use strata_core::errors::StrataResult;
use strata_core::models::{
    DispatchStatus, JobStatus, MaintenanceDetails, MemoryMaintenanceJob, WorkerJob, WorkerNode,
    WorkerRequest,
};

use super::rows::{col, col_bool, col_json, col_opt_ts, col_ts, to_json};
use crate::to_storage_err;

const MAINTENANCE_COLUMNS: &str =
    "id, run_id, job_type, status, used_worker, details, error, started_at, finished_at";

const WORKER_JOB_COLUMNS: &str = "id, job_type, payload, priority, status, result, error,
    used_fallback_local, created_at, finished_at";

/// Open a job row in `running` state.
pub fn create_maintenance_job(
    conn: &Connection,
    run_id: Option<RunId>,
    job_type: &str,
) -> StrataResult<MemoryMaintenanceJob> {
    let started_at = Utc::now();
    let details = MaintenanceDetails::default();
    conn.execute(
        "INSERT INTO memory_maintenance_jobs (run_id, job_type, status, details, started_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            run_id,
            job_type,
            JobStatus::Running.as_str(),
            to_json(&details)?,
            started_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("create maintenance job: {e}")))?;
    Ok(MemoryMaintenanceJob {
        id: conn.last_insert_rowid(),
        run_id,
        job_type: job_type.to_string(),
        status: JobStatus::Running,
        used_worker: false,
        details,
        error: None,
        started_at,
        finished_at: None,
    })
}

pub fn finish_maintenance_job(conn: &Connection, job: &MemoryMaintenanceJob) -> StrataResult<()> {
    let finished_at = job.finished_at.unwrap_or_else(Utc::now);
    conn.execute(
        "UPDATE memory_maintenance_jobs
         SET status = ?2, used_worker = ?3, details = ?4, error = ?5, finished_at = ?6
         WHERE id = ?1",
        params![
            job.id,
            job.status.as_str(),
            job.used_worker as i32,
            to_json(&job.details)?,
            job.error,
            finished_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("finish maintenance job {}: {e}", job.id)))?;
    Ok(())
}

/// Most recent first.
pub fn recent_maintenance_jobs(
    conn: &Connection,
    limit: usize,
) -> StrataResult<Vec<MemoryMaintenanceJob>> {
    let sql = format!(
        "SELECT {MAINTENANCE_COLUMNS} FROM memory_maintenance_jobs ORDER BY id DESC LIMIT ?1"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_maintenance_job(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn row_to_maintenance_job(row: &Row<'_>) -> StrataResult<MemoryMaintenanceJob> {
    Ok(MemoryMaintenanceJob {
        id: col(row, 0)?,
        run_id: col(row, 1)?,
        job_type: col(row, 2)?,
        status: JobStatus::parse(&col::<String>(row, 3)?),
        used_worker: col_bool(row, 4)?,
        details: col_json(row, 5)?,
        error: col(row, 6)?,
        started_at: col_ts(row, 7)?,
        finished_at: col_opt_ts(row, 8)?,
    })
}

/// Record a dispatch attempt in `queued` state.
pub fn insert_worker_job(conn: &Connection, request: &WorkerRequest) -> StrataResult<WorkerJob> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO worker_jobs (job_type, payload, priority, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            request.job_type,
            to_json(&request.payload)?,
            request.priority as i64,
            DispatchStatus::Queued.as_str(),
            created_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("insert worker job: {e}")))?;
    Ok(WorkerJob {
        id: conn.last_insert_rowid(),
        job_type: request.job_type.clone(),
        payload: request.payload.clone(),
        priority: request.priority,
        status: DispatchStatus::Queued,
        result: None,
        error: None,
        used_fallback_local: false,
        created_at,
        finished_at: None,
    })
}

pub fn finish_worker_job(conn: &Connection, job: &WorkerJob) -> StrataResult<()> {
    let result = job.result.as_ref().map(to_json).transpose()?;
    let finished_at = job.finished_at.unwrap_or_else(Utc::now);
    conn.execute(
        "UPDATE worker_jobs
         SET status = ?2, result = ?3, error = ?4, used_fallback_local = ?5, finished_at = ?6
         WHERE id = ?1",
        params![
            job.id,
            job.status.as_str(),
            result,
            job.error,
            job.used_fallback_local as i32,
            finished_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("finish worker job {}: {e}", job.id)))?;
    Ok(())
}

/// Most recent first.
pub fn recent_worker_jobs(conn: &Connection, limit: usize) -> StrataResult<Vec<WorkerJob>> {
    let sql = format!("SELECT {WORKER_JOB_COLUMNS} FROM worker_jobs ORDER BY id DESC LIMIT ?1");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_worker_job(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn row_to_worker_job(row: &Row<'_>) -> StrataResult<WorkerJob> {
    let result: Option<String> = col(row, 5)?;
    let result = result
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|e| to_storage_err(format!("parse worker result: {e}")))?;
    Ok(WorkerJob {
        id: col(row, 0)?,
        job_type: col(row, 1)?,
        payload: col_json(row, 2)?,
        priority: col::<i64>(row, 3)?.clamp(0, u8::MAX as i64) as u8,
        status: DispatchStatus::parse(&col::<String>(row, 4)?),
        result,
        error: col(row, 6)?,
        used_fallback_local: col_bool(row, 7)?,
        created_at: col_ts(row, 8)?,
        finished_at: col_opt_ts(row, 9)?,
    })
}

/// Register a worker by name. Re-registering updates its URL and capabilities.
pub fn register_worker(
    conn: &Connection,
    name: &str,
    url: &str,
    capabilities: &[String],
) -> StrataResult<WorkerNode> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO worker_nodes (name, url, capabilities, registered_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (name) DO UPDATE SET
            url = excluded.url,
            capabilities = excluded.capabilities,
            registered_at = excluded.registered_at",
        params![name, url, to_json(&capabilities)?, now],
    )
    .map_err(|e| to_storage_err(format!("register worker {name}: {e}")))?;
    conn.query_row(
        "SELECT id, name, url, capabilities, registered_at FROM worker_nodes WHERE name = ?1",
        params![name],
        |row| Ok(row_to_worker_node(row)),
    )
    .map_err(|e| to_storage_err(e.to_string()))?
}

pub fn list_workers(conn: &Connection) -> StrataResult<Vec<WorkerNode>> {
    let mut stmt = conn
        .prepare("SELECT id, name, url, capabilities, registered_at FROM worker_nodes ORDER BY id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok(row_to_worker_node(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn row_to_worker_node(row: &Row<'_>) -> StrataResult<WorkerNode> {
    Ok(WorkerNode {
        id: col(row, 0)?,
        name: col(row, 1)?,
        url: col(row, 2)?,
        capabilities: col_json(row, 3)?,
        registered_at: col_ts(row, 4)?,
    })
}
