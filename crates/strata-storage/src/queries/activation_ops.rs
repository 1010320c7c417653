//! Context activations, usefulness metrics, and refinement summaries.

use rusqlite::{params, Connection, Row};

use strata_core::capsule::{CapsuleId, RunId};
use strata_core::errors::StrataResult;
use strata_core::models::{ContextActivation, MemorySummary, MemoryUsefulnessMetric};

use super::rows::{col, col_json, col_parse, col_ts, col_u64, to_json, OptionalRow};
use crate::to_storage_err;

pub fn insert_activation(conn: &Connection, a: &ContextActivation) -> StrataResult<i64> {
    conn.execute(
        "INSERT INTO context_activations (
            run_id, capsule_id, query_text, score, memory_layer, reason, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            a.run_id,
            a.capsule_id,
            a.query_text,
            a.score,
            a.layer.as_str(),
            to_json(&a.reason)?,
            a.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert activation: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Most recent first.
pub fn activations_for_run(
    conn: &Connection,
    run_id: RunId,
    limit: usize,
) -> StrataResult<Vec<ContextActivation>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, run_id, capsule_id, query_text, score, memory_layer, reason, created_at
             FROM context_activations WHERE run_id = ?1
             ORDER BY id DESC LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id, limit as i64], |row| Ok(row_to_activation(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Number of distinct runs that admitted at least one capsule.
pub fn runs_with_activations(conn: &Connection) -> StrataResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(DISTINCT run_id) FROM context_activations WHERE run_id IS NOT NULL",
            [],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}

fn row_to_activation(row: &Row<'_>) -> StrataResult<ContextActivation> {
    Ok(ContextActivation {
        id: col(row, 0)?,
        run_id: col(row, 1)?,
        capsule_id: col(row, 2)?,
        query_text: col(row, 3)?,
        score: col(row, 4)?,
        layer: col_parse(row, 5)?,
        reason: col_json(row, 6)?,
        created_at: col_ts(row, 7)?,
    })
}

pub fn get_usefulness(
    conn: &Connection,
    run_id: RunId,
    capsule_id: CapsuleId,
) -> StrataResult<Option<MemoryUsefulnessMetric>> {
    let result = conn
        .query_row(
            "SELECT run_id, capsule_id, retrieved_count, used_count, unused_count,
                    helped_final_answer_score, helped_tool_execution_score,
                    contradiction_penalty, stale_penalty, confidence_gain, updated_at
             FROM memory_usefulness_metrics WHERE run_id = ?1 AND capsule_id = ?2",
            params![run_id, capsule_id],
            |row| Ok(row_to_metric(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Replace the metric row for (run, capsule).
pub fn upsert_usefulness(conn: &Connection, m: &MemoryUsefulnessMetric) -> StrataResult<()> {
    conn.execute(
        "INSERT INTO memory_usefulness_metrics (
            run_id, capsule_id, retrieved_count, used_count, unused_count,
            helped_final_answer_score, helped_tool_execution_score,
            contradiction_penalty, stale_penalty, confidence_gain, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT (run_id, capsule_id) DO UPDATE SET
            retrieved_count = excluded.retrieved_count,
            used_count = excluded.used_count,
            unused_count = excluded.unused_count,
            helped_final_answer_score = excluded.helped_final_answer_score,
            helped_tool_execution_score = excluded.helped_tool_execution_score,
            contradiction_penalty = excluded.contradiction_penalty,
            stale_penalty = excluded.stale_penalty,
            confidence_gain = excluded.confidence_gain,
            updated_at = excluded.updated_at",
        params![
            m.run_id,
            m.capsule_id,
            m.retrieved_count as i64,
            m.used_count as i64,
            m.unused_count as i64,
            m.helped_final_answer_score,
            m.helped_tool_execution_score,
            m.contradiction_penalty,
            m.stale_penalty,
            m.confidence_gain,
            m.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert usefulness: {e}")))?;
    Ok(())
}

fn row_to_metric(row: &Row<'_>) -> StrataResult<MemoryUsefulnessMetric> {
    Ok(MemoryUsefulnessMetric {
        run_id: col(row, 0)?,
        capsule_id: col(row, 1)?,
        retrieved_count: col_u64(row, 2)?,
        used_count: col_u64(row, 3)?,
        unused_count: col_u64(row, 4)?,
        helped_final_answer_score: col(row, 5)?,
        helped_tool_execution_score: col(row, 6)?,
        contradiction_penalty: col(row, 7)?,
        stale_penalty: col(row, 8)?,
        confidence_gain: col(row, 9)?,
        updated_at: col_ts(row, 10)?,
    })
}

pub fn insert_summary(conn: &Connection, s: &MemorySummary) -> StrataResult<i64> {
    conn.execute(
        "INSERT INTO memory_summaries (capsule_id, summary_capsule_id, child_ids, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            s.capsule_id,
            s.summary_capsule_id,
            to_json(&s.child_ids)?,
            s.created_at.to_rfc3339()
        ],
    )
    .map_err(|e| to_storage_err(format!("insert summary: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Latest summary recorded for a parent capsule.
pub fn summary_for(
    conn: &Connection,
    capsule_id: CapsuleId,
) -> StrataResult<Option<MemorySummary>> {
    let result = conn
        .query_row(
            "SELECT id, capsule_id, summary_capsule_id, child_ids, created_at
             FROM memory_summaries WHERE capsule_id = ?1
             ORDER BY id DESC LIMIT 1",
            params![capsule_id],
            |row| {
                Ok((|| -> StrataResult<MemorySummary> {
                    Ok(MemorySummary {
                        id: col(row, 0)?,
                        capsule_id: col(row, 1)?,
                        summary_capsule_id: col(row, 2)?,
                        child_ids: col_json(row, 3)?,
                        created_at: col_ts(row, 4)?,
                    })
                })())
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}
