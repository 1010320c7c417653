//! Reinforcement graph adjacency index.

use std::collections::BTreeMap;

use rusqlite::{params, params_from_iter, Connection, Row};

use strata_core::capsule::CapsuleId;
use strata_core::errors::{GraphError, StrataResult};
use strata_core::models::{EdgeReinforcement, MemoryEdge};

use super::rows::{col, col_parse, col_ts, col_u64, placeholders};
use crate::to_storage_err;

const EDGE_COLUMNS: &str = "id, from_capsule_id, to_capsule_id, edge_type, weight, confidence,
    trust_score, usage_count, created_at, last_reinforced_at";

/// Insert a new edge with usage 1, or max-merge weight, confidence and trust
/// into the existing one and bump its usage.
pub fn upsert_edge(conn: &Connection, r: &EdgeReinforcement) -> StrataResult<MemoryEdge> {
    if r.from == r.to {
        return Err(GraphError::InvalidEdge {
            from: r.from,
            to: r.to,
        }
        .into());
    }
    let at = r.at.to_rfc3339();
    conn.execute(
        "INSERT INTO memory_edges (
            from_capsule_id, to_capsule_id, edge_type, weight, confidence, trust_score,
            usage_count, created_at, last_reinforced_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
        ON CONFLICT (from_capsule_id, to_capsule_id, edge_type) DO UPDATE SET
            weight = MAX(weight, excluded.weight),
            confidence = MAX(confidence, excluded.confidence),
            trust_score = MAX(trust_score, excluded.trust_score),
            usage_count = usage_count + 1,
            last_reinforced_at = excluded.last_reinforced_at",
        params![
            r.from,
            r.to,
            r.edge_type.as_str(),
            r.weight.clamp(0.0, 1.0),
            r.confidence.clamp(0.0, 1.0),
            r.trust.clamp(0.0, 1.0),
            at
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert edge {} -> {}: {e}", r.from, r.to)))?;

    let sql = format!(
        "SELECT {EDGE_COLUMNS} FROM memory_edges
         WHERE from_capsule_id = ?1 AND to_capsule_id = ?2 AND edge_type = ?3"
    );
    conn.query_row(&sql, params![r.from, r.to, r.edge_type.as_str()], |row| {
        Ok(row_to_edge(row))
    })
    .map_err(|e| to_storage_err(e.to_string()))?
}

/// Edges with either endpoint in `ids`, each reported once.
pub fn edges_touching(conn: &Connection, ids: &[CapsuleId]) -> StrataResult<Vec<MemoryEdge>> {
    let mut by_id: BTreeMap<i64, MemoryEdge> = BTreeMap::new();
    for chunk in ids.chunks(400) {
        let list = placeholders(chunk.len());
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM memory_edges
             WHERE from_capsule_id IN ({list}) OR to_capsule_id IN ({list})"
        );
        let bound = chunk.iter().chain(chunk.iter());
        for edge in query_edges(conn, &sql, params_from_iter(bound))? {
            by_id.insert(edge.id, edge);
        }
    }
    Ok(by_id.into_values().collect())
}

/// Incident edges, heaviest first.
pub fn edges_for(conn: &Connection, id: CapsuleId) -> StrataResult<Vec<MemoryEdge>> {
    let sql = format!(
        "SELECT {EDGE_COLUMNS} FROM memory_edges
         WHERE from_capsule_id = ?1 OR to_capsule_id = ?1
         ORDER BY weight DESC, id"
    );
    query_edges(conn, &sql, params![id])
}

/// Delete edges that are both light and rarely used.
pub fn prune_edges(conn: &Connection, max_weight: f64, min_usage: u64) -> StrataResult<usize> {
    conn.execute(
        "DELETE FROM memory_edges WHERE weight < ?1 AND usage_count < ?2",
        params![max_weight, min_usage as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn edge_count(conn: &Connection) -> StrataResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_edges", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}

fn query_edges<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StrataResult<Vec<MemoryEdge>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_edge(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn row_to_edge(row: &Row<'_>) -> StrataResult<MemoryEdge> {
    Ok(MemoryEdge {
        id: col(row, 0)?,
        from_capsule_id: col(row, 1)?,
        to_capsule_id: col(row, 2)?,
        edge_type: col_parse(row, 3)?,
        weight: col(row, 4)?,
        confidence: col(row, 5)?,
        trust_score: col(row, 6)?,
        usage_count: col_u64(row, 7)?,
        created_at: col_ts(row, 8)?,
        last_reinforced_at: col_ts(row, 9)?,
    })
}
