//! Contradiction records.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use strata_core::capsule::CapsuleId;
use strata_core::errors::StrataResult;
use strata_core::models::{ConflictStatus, MemoryConflict};

use super::rows::{col, col_json, col_ts, to_json};
use crate::to_storage_err;

const CONFLICT_COLUMNS: &str = "id, left_capsule_id, right_capsule_id, conflict_score, status,
    detail, created_at, updated_at";

/// One row per ordered pair. Re-detection keeps the highest score and
/// refreshes the detail only when the score improved.
pub fn upsert_conflict(
    conn: &Connection,
    left: CapsuleId,
    right: CapsuleId,
    score: f64,
    detail: &serde_json::Value,
) -> StrataResult<MemoryConflict> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO memory_conflicts (
            left_capsule_id, right_capsule_id, conflict_score, status, detail,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, 'open', ?4, ?5, ?5)
        ON CONFLICT (left_capsule_id, right_capsule_id) DO UPDATE SET
            detail = CASE WHEN excluded.conflict_score > conflict_score
                          THEN excluded.detail ELSE detail END,
            conflict_score = MAX(conflict_score, excluded.conflict_score),
            updated_at = excluded.updated_at",
        params![left, right, score.clamp(0.0, 1.0), to_json(detail)?, now],
    )
    .map_err(|e| to_storage_err(format!("upsert conflict {left} / {right}: {e}")))?;

    let sql = format!(
        "SELECT {CONFLICT_COLUMNS} FROM memory_conflicts
         WHERE left_capsule_id = ?1 AND right_capsule_id = ?2"
    );
    conn.query_row(&sql, params![left, right], |row| Ok(row_to_conflict(row)))
        .map_err(|e| to_storage_err(e.to_string()))?
}

/// Highest score first.
pub fn list_conflicts(conn: &Connection, limit: usize) -> StrataResult<Vec<MemoryConflict>> {
    let sql = format!(
        "SELECT {CONFLICT_COLUMNS} FROM memory_conflicts
         ORDER BY conflict_score DESC, id LIMIT ?1"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![limit as i64], |row| Ok(row_to_conflict(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

pub fn conflict_count(conn: &Connection) -> StrataResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_conflicts", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}

fn row_to_conflict(row: &Row<'_>) -> StrataResult<MemoryConflict> {
    Ok(MemoryConflict {
        id: col(row, 0)?,
        left_capsule_id: col(row, 1)?,
        right_capsule_id: col(row, 2)?,
        conflict_score: col(row, 3)?,
        status: ConflictStatus::parse(&col::<String>(row, 4)?),
        detail: col_json(row, 5)?,
        created_at: col_ts(row, 6)?,
        updated_at: col_ts(row, 7)?,
    })
}
