//! Append-only run trace log.

use rusqlite::{params, Connection};

use strata_core::capsule::RunId;
use strata_core::errors::StrataResult;
use strata_core::models::{NewTraceEvent, TraceEvent, TraceEventType};

use super::rows::{col, col_json, col_ts, to_json};
use crate::to_storage_err;

pub fn append_event(conn: &Connection, event: &NewTraceEvent) -> StrataResult<i64> {
    conn.execute(
        "INSERT INTO run_traces (run_id, event_type, payload, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            event.run_id,
            event.event_type.as_str(),
            to_json(&event.payload)?,
            event.created_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("append trace event: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Events for a run, oldest first. Rows with unrecognised event types are skipped.
pub fn events_for_run(
    conn: &Connection,
    run_id: RunId,
    limit: usize,
) -> StrataResult<Vec<TraceEvent>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, run_id, event_type, payload, created_at FROM run_traces
             WHERE run_id = ?1 ORDER BY id LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id, limit as i64], |row| {
            Ok((|| -> StrataResult<Option<TraceEvent>> {
                let raw_type: String = col(row, 2)?;
                let Some(event_type) = TraceEventType::parse(&raw_type) else {
                    tracing::debug!(event_type = %raw_type, "skipping unknown trace event type");
                    return Ok(None);
                };
                Ok(Some(TraceEvent {
                    id: col(row, 0)?,
                    run_id: col(row, 1)?,
                    event_type,
                    payload: col_json(row, 3)?,
                    created_at: col_ts(row, 4)?,
                }))
            })())
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        if let Some(event) = row.map_err(|e| to_storage_err(e.to_string()))?? {
            out.push(event);
        }
    }
    Ok(out)
}
