//! v003: conflicts and duplicate clusters.

use rusqlite::Connection;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> StrataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_conflicts (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            left_capsule_id    INTEGER NOT NULL REFERENCES memory_capsules(id),
            right_capsule_id   INTEGER NOT NULL REFERENCES memory_capsules(id),
            conflict_score     REAL NOT NULL,
            status             TEXT NOT NULL DEFAULT 'open',
            detail             TEXT NOT NULL DEFAULT '{}',
            created_at         TEXT NOT NULL,
            updated_at         TEXT NOT NULL,
            UNIQUE (left_capsule_id, right_capsule_id)
        );

        CREATE INDEX IF NOT EXISTS idx_conflicts_score ON memory_conflicts(conflict_score);

        CREATE TABLE IF NOT EXISTS duplicate_clusters (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            hash_key              TEXT NOT NULL UNIQUE,
            canonical_capsule_id  INTEGER NOT NULL REFERENCES memory_capsules(id),
            member_ids            TEXT NOT NULL DEFAULT '[]',
            cluster_size          INTEGER NOT NULL DEFAULT 1,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
