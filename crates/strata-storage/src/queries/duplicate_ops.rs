//! Duplicate clusters keyed by normalized-text hash.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use strata_core::capsule::CapsuleId;
use strata_core::errors::StrataResult;
use strata_core::models::DuplicateCluster;

use super::rows::{col, col_json, col_ts, col_u64, to_json, OptionalRow};
use crate::to_storage_err;

const CLUSTER_COLUMNS: &str =
    "id, hash_key, canonical_capsule_id, member_ids, cluster_size, created_at, updated_at";

/// Create the cluster for `hash_key` with `capsule_id` as canonical, or add
/// `capsule_id` to the existing member set. Members only ever grow.
pub fn join_cluster(
    conn: &Connection,
    hash_key: &str,
    capsule_id: CapsuleId,
) -> StrataResult<DuplicateCluster> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("join_cluster begin: {e}")))?;
    let now = Utc::now().to_rfc3339();

    let result = (|| -> StrataResult<()> {
        match find_by_hash(&tx, hash_key)? {
            Some(mut cluster) => {
                if !cluster.member_ids.contains(&capsule_id) {
                    cluster.member_ids.push(capsule_id);
                    cluster.member_ids.sort_unstable();
                    cluster.cluster_size = cluster.member_ids.len();
                    tx.execute(
                        "UPDATE duplicate_clusters
                         SET member_ids = ?2, cluster_size = ?3, updated_at = ?4
                         WHERE id = ?1",
                        params![
                            cluster.id,
                            to_json(&cluster.member_ids)?,
                            cluster.cluster_size as i64,
                            now
                        ],
                    )
                    .map_err(|e| to_storage_err(e.to_string()))?;
                }
                Ok(())
            }
            None => {
                tx.execute(
                    "INSERT INTO duplicate_clusters (
                        hash_key, canonical_capsule_id, member_ids, cluster_size,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, 1, ?4, ?4)",
                    params![hash_key, capsule_id, to_json(&vec![capsule_id])?, now],
                )
                .map_err(|e| to_storage_err(e.to_string()))?;
                Ok(())
            }
        }
    })();

    result?;
    let cluster = find_by_hash(&tx, hash_key)?
        .ok_or_else(|| to_storage_err(format!("cluster {hash_key} missing after upsert")))?;
    tx.commit()
        .map_err(|e| to_storage_err(format!("join_cluster commit: {e}")))?;
    Ok(cluster)
}

/// Clusters with at least `min_size` members, largest first.
pub fn list_clusters(conn: &Connection, min_size: usize) -> StrataResult<Vec<DuplicateCluster>> {
    let sql = format!(
        "SELECT {CLUSTER_COLUMNS} FROM duplicate_clusters
         WHERE cluster_size >= ?1 ORDER BY cluster_size DESC, id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![min_size as i64], |row| Ok(row_to_cluster(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

fn find_by_hash(conn: &Connection, hash_key: &str) -> StrataResult<Option<DuplicateCluster>> {
    let sql = format!("SELECT {CLUSTER_COLUMNS} FROM duplicate_clusters WHERE hash_key = ?1");
    let result = conn
        .query_row(&sql, params![hash_key], |row| Ok(row_to_cluster(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    result.transpose()
}

fn row_to_cluster(row: &Row<'_>) -> StrataResult<DuplicateCluster> {
    Ok(DuplicateCluster {
        id: col(row, 0)?,
        hash_key: col(row, 1)?,
        canonical_capsule_id: col(row, 2)?,
        member_ids: col_json(row, 3)?,
        cluster_size: col_u64(row, 4)? as usize,
        created_at: col_ts(row, 5)?,
        updated_at: col_ts(row, 6)?,
    })
}
