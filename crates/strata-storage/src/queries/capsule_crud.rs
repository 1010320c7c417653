//! Insert, get, and relabel capsules. Embeddings and state rows are written
//! in the same transaction as the capsule they belong to.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};

use strata_core::capsule::{
    ArchiveStatus, Capsule, CapsuleEmbedding, CapsuleId, MemoryCapsuleState, MemoryLayer,
    NewCapsule,
};
use strata_core::errors::{StrataError, StrataResult};

use super::embedding_codec::{bytes_to_f32_vec, f32_vec_to_bytes};
use super::rows::{
    col, col_bool, col_json, col_opt_ts, col_parse, col_ts, col_u64, placeholders, to_json,
    OptionalRow,
};
use crate::to_storage_err;

/// Column list matching [`row_to_capsule`].
pub const CAPSULE_COLUMNS: &str = "id, run_id, attachment_id, source, source_type, chunk_index,
    text, tags, project_key, session_key, is_summary, memory_layer, decay_class, archive_status,
    confidence, consolidation_score, trust_score, recency_score, retrieval_count, success_count,
    failure_count, contradiction_flag, duplicate_cluster_id, duplicate_score, parent_capsule_id,
    lineage_root_id, created_from_run_id, created_at, last_accessed_at, last_used_at";

/// Number of columns in [`CAPSULE_COLUMNS`].
pub const CAPSULE_COLUMN_COUNT: usize = 30;

/// Insert capsules and their embeddings atomically. Returns ids in input order.
pub fn insert_capsules(
    conn: &Connection,
    capsules: &[(NewCapsule, Vec<f32>)],
    model: &str,
) -> StrataResult<Vec<CapsuleId>> {
    if capsules.is_empty() {
        return Ok(Vec::new());
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_capsules begin: {e}")))?;

    let mut ids = Vec::with_capacity(capsules.len());
    for (capsule, vector) in capsules {
        ids.push(insert_capsule_inner(&tx, capsule, vector, model)?);
    }
    tx.commit()
        .map_err(|e| to_storage_err(format!("insert_capsules commit: {e}")))?;
    Ok(ids)
}

fn insert_capsule_inner(
    conn: &Connection,
    capsule: &NewCapsule,
    vector: &[f32],
    model: &str,
) -> StrataResult<CapsuleId> {
    let created_at = capsule.created_at.to_rfc3339();
    conn.execute(
        "INSERT INTO memory_capsules (
            run_id, attachment_id, source, source_type, chunk_index, text, tags,
            project_key, session_key, is_summary, memory_layer, decay_class, archive_status,
            confidence, consolidation_score, trust_score, recency_score,
            parent_capsule_id, lineage_root_id, created_from_run_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                  ?18, ?19, ?20, ?21)",
        params![
            capsule.run_id,
            capsule.attachment_id,
            capsule.source,
            capsule.source_type,
            capsule.chunk_index,
            capsule.text,
            to_json(&capsule.tags)?,
            capsule.project_key,
            capsule.session_key,
            capsule.is_summary as i32,
            capsule.layer.as_str(),
            capsule.decay_class.as_str(),
            capsule.archive_status.as_str(),
            capsule.confidence,
            capsule.consolidation_score,
            capsule.trust_score,
            capsule.recency_score,
            capsule.parent_capsule_id,
            capsule.lineage_root_id,
            capsule.created_from_run_id,
            created_at,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert capsule: {e}")))?;
    let id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO capsule_embeddings (capsule_id, vector, dimensions, model)
         VALUES (?1, ?2, ?3, ?4)",
        params![id, f32_vec_to_bytes(vector), vector.len() as i64, model],
    )
    .map_err(|e| to_storage_err(format!("insert embedding: {e}")))?;

    conn.execute(
        "INSERT INTO memory_capsule_state (capsule_id, last_layer, updated_at)
         VALUES (?1, ?2, ?3)",
        params![id, capsule.layer.as_str(), created_at],
    )
    .map_err(|e| to_storage_err(format!("insert state: {e}")))?;

    Ok(id)
}

/// Get a single capsule by id.
pub fn get_capsule(conn: &Connection, id: CapsuleId) -> StrataResult<Option<Capsule>> {
    let sql = format!("SELECT {CAPSULE_COLUMNS} FROM memory_capsules WHERE id = ?1");
    let result = conn
        .query_row(&sql, params![id], |row| Ok(row_to_capsule(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

/// Get capsules by id, in ascending id order. Unknown ids are skipped.
pub fn get_capsules(conn: &Connection, ids: &[CapsuleId]) -> StrataResult<Vec<Capsule>> {
    let mut out = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(500) {
        let sql = format!(
            "SELECT {CAPSULE_COLUMNS} FROM memory_capsules WHERE id IN ({}) ORDER BY id",
            placeholders(chunk.len())
        );
        out.extend(query_capsules(conn, &sql, params_from_iter(chunk.iter()))?);
    }
    out.sort_by_key(|c| c.id);
    Ok(out)
}

/// Run a capsule SELECT built on [`CAPSULE_COLUMNS`].
pub fn query_capsules<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StrataResult<Vec<Capsule>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_capsule(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Move a capsule to a layer and archive status.
pub fn set_layer(
    conn: &Connection,
    id: CapsuleId,
    layer: MemoryLayer,
    status: ArchiveStatus,
) -> StrataResult<()> {
    let changed = conn
        .execute(
            "UPDATE memory_capsules SET memory_layer = ?2, archive_status = ?3 WHERE id = ?1",
            params![id, layer.as_str(), status.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(StrataError::CapsuleNotFound { id });
    }
    conn.execute(
        "UPDATE memory_capsule_state SET last_layer = ?2, updated_at = ?3 WHERE capsule_id = ?1",
        params![id, layer.as_str(), Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn set_contradiction_flag(conn: &Connection, id: CapsuleId, flag: bool) -> StrataResult<()> {
    let changed = conn
        .execute(
            "UPDATE memory_capsules SET contradiction_flag = ?2 WHERE id = ?1",
            params![id, flag as i32],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(StrataError::CapsuleNotFound { id });
    }
    Ok(())
}

/// Record cluster membership. The duplicate score never decreases.
pub fn set_duplicate(
    conn: &Connection,
    id: CapsuleId,
    cluster_id: i64,
    duplicate_score: f64,
) -> StrataResult<()> {
    let changed = conn
        .execute(
            "UPDATE memory_capsules
             SET duplicate_cluster_id = ?2, duplicate_score = MAX(duplicate_score, ?3)
             WHERE id = ?1",
            params![id, cluster_id, duplicate_score.clamp(0.0, 1.0)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(StrataError::CapsuleNotFound { id });
    }
    Ok(())
}

pub fn get_embedding(conn: &Connection, id: CapsuleId) -> StrataResult<Option<CapsuleEmbedding>> {
    let row = conn
        .query_row(
            "SELECT capsule_id, vector, model FROM capsule_embeddings WHERE capsule_id = ?1",
            params![id],
            |row| {
                let blob: Vec<u8> = row.get(1)?;
                Ok((row.get::<_, i64>(0)?, blob, row.get::<_, String>(2)?))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(row.map(|(capsule_id, blob, model)| {
        let vector = bytes_to_f32_vec(&blob);
        CapsuleEmbedding {
            capsule_id,
            dimensions: vector.len(),
            vector,
            model,
        }
    }))
}

pub fn get_state(conn: &Connection, id: CapsuleId) -> StrataResult<Option<MemoryCapsuleState>> {
    let result = conn
        .query_row(
            "SELECT capsule_id, retrieval_count, success_count, failure_count, last_layer,
                    last_accessed_at, updated_at
             FROM memory_capsule_state WHERE capsule_id = ?1",
            params![id],
            |row| Ok(row_to_state(row)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

fn row_to_state(row: &Row<'_>) -> StrataResult<MemoryCapsuleState> {
    Ok(MemoryCapsuleState {
        capsule_id: col(row, 0)?,
        retrieval_count: col_u64(row, 1)?,
        success_count: col_u64(row, 2)?,
        failure_count: col_u64(row, 3)?,
        last_layer: col_parse(row, 4)?,
        last_accessed_at: col_opt_ts(row, 5)?,
        updated_at: col_ts(row, 6)?,
    })
}

/// Parse a row selected with [`CAPSULE_COLUMNS`], starting at column 0.
pub fn row_to_capsule(row: &Row<'_>) -> StrataResult<Capsule> {
    let created_at: DateTime<Utc> = col_ts(row, 27)?;
    Ok(Capsule {
        id: col(row, 0)?,
        run_id: col(row, 1)?,
        attachment_id: col(row, 2)?,
        source: col(row, 3)?,
        source_type: col(row, 4)?,
        chunk_index: col::<i64>(row, 5)?.max(0) as u32,
        text: col(row, 6)?,
        tags: col_json(row, 7)?,
        project_key: col(row, 8)?,
        session_key: col(row, 9)?,
        is_summary: col_bool(row, 10)?,
        layer: col_parse(row, 11)?,
        decay_class: col_parse(row, 12)?,
        archive_status: col_parse(row, 13)?,
        confidence: col(row, 14)?,
        consolidation_score: col(row, 15)?,
        trust_score: col(row, 16)?,
        recency_score: col(row, 17)?,
        retrieval_count: col_u64(row, 18)?,
        success_count: col_u64(row, 19)?,
        failure_count: col_u64(row, 20)?,
        contradiction_flag: col_bool(row, 21)?,
        duplicate_cluster_id: col(row, 22)?,
        duplicate_score: col(row, 23)?,
        parent_capsule_id: col(row, 24)?,
        lineage_root_id: col(row, 25)?,
        created_from_run_id: col(row, 26)?,
        created_at,
        last_accessed_at: col_opt_ts(row, 28)?,
        last_used_at: col_opt_ts(row, 29)?,
    })
}
