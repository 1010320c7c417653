//! Capsule listings, the retrieval candidate pool, lineage, and aggregation.

use rusqlite::{params, Connection};

use strata_core::capsule::{Capsule, CapsuleId, MemoryLayer, RunId};
use strata_core::errors::StrataResult;

use super::capsule_crud::{query_capsules, row_to_capsule, CAPSULE_COLUMNS, CAPSULE_COLUMN_COUNT};
use super::embedding_codec::bytes_to_f32_vec;
use super::rows::col;
use crate::to_storage_err;

/// All capsules ordered by id, optionally for one run and optionally
/// including cold ones.
pub fn list_capsules(
    conn: &Connection,
    run_id: Option<RunId>,
    include_cold: bool,
) -> StrataResult<Vec<Capsule>> {
    let cold_filter = if include_cold {
        ""
    } else {
        "AND archive_status = 'active'"
    };
    let sql = format!(
        "SELECT {CAPSULE_COLUMNS} FROM memory_capsules
         WHERE (?1 IS NULL OR run_id = ?1) {cold_filter}
         ORDER BY id"
    );
    query_capsules(conn, &sql, params![run_id])
}

/// Most recent capsules first (by id).
pub fn recent_capsules(
    conn: &Connection,
    run_id: Option<RunId>,
    limit: usize,
) -> StrataResult<Vec<Capsule>> {
    let sql = format!(
        "SELECT {CAPSULE_COLUMNS} FROM memory_capsules
         WHERE (?1 IS NULL OR run_id = ?1)
         ORDER BY id DESC LIMIT ?2"
    );
    query_capsules(conn, &sql, params![run_id, limit as i64])
}

/// Active capsules joined with their vectors.
pub fn candidates(
    conn: &Connection,
    run_id: Option<RunId>,
) -> StrataResult<Vec<(Capsule, Vec<f32>)>> {
    let sql = format!(
        "SELECT {CAPSULE_COLUMNS}, e.vector
         FROM memory_capsules
         JOIN capsule_embeddings e ON e.capsule_id = memory_capsules.id
         WHERE archive_status = 'active' AND (?1 IS NULL OR run_id = ?1)
         ORDER BY id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok(row_to_capsule(row).and_then(|capsule| {
                let blob: Vec<u8> = col(row, CAPSULE_COLUMN_COUNT)?;
                Ok((capsule, bytes_to_f32_vec(&blob)))
            }))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Direct children of a capsule.
pub fn children_of(conn: &Connection, id: CapsuleId) -> StrataResult<Vec<Capsule>> {
    let sql = format!(
        "SELECT {CAPSULE_COLUMNS} FROM memory_capsules WHERE parent_capsule_id = ?1 ORDER BY id"
    );
    query_capsules(conn, &sql, params![id])
}

/// Descendants sharing a lineage root.
pub fn lineage_members(conn: &Connection, root_id: CapsuleId) -> StrataResult<Vec<Capsule>> {
    let sql = format!(
        "SELECT {CAPSULE_COLUMNS} FROM memory_capsules
         WHERE lineage_root_id = ?1 AND id <> ?1 ORDER BY id"
    );
    query_capsules(conn, &sql, params![root_id])
}

/// Capsule counts per layer, hottest first. Layers with no capsules report 0.
pub fn count_by_layer(conn: &Connection) -> StrataResult<Vec<(MemoryLayer, usize)>> {
    let mut stmt = conn
        .prepare("SELECT memory_layer, COUNT(*) FROM memory_capsules GROUP BY memory_layer")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut counts: Vec<(MemoryLayer, usize)> =
        MemoryLayer::ALL.iter().map(|layer| (*layer, 0)).collect();
    for row in rows {
        let (name, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        match name.parse::<MemoryLayer>() {
            Ok(layer) => counts[layer.priority() as usize].1 = count.max(0) as usize,
            Err(e) => tracing::warn!(layer = %name, error = %e, "unknown layer in store"),
        }
    }
    Ok(counts)
}

pub fn capsule_count(conn: &Connection) -> StrataResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_capsules", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}
