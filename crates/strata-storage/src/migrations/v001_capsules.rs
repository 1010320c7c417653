//! v001: capsules, their embeddings, and the counter rollup.

use rusqlite::Connection;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> StrataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_capsules (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id               INTEGER NOT NULL,
            attachment_id        INTEGER,
            source               TEXT NOT NULL,
            source_type          TEXT NOT NULL DEFAULT 'chunk',
            chunk_index          INTEGER NOT NULL DEFAULT 0,
            text                 TEXT NOT NULL,
            tags                 TEXT NOT NULL DEFAULT '[]',
            project_key          TEXT,
            session_key          TEXT,
            is_summary           INTEGER NOT NULL DEFAULT 0,
            memory_layer         TEXT NOT NULL,
            decay_class          TEXT NOT NULL,
            archive_status       TEXT NOT NULL DEFAULT 'active',
            confidence           REAL NOT NULL,
            consolidation_score  REAL NOT NULL,
            trust_score          REAL NOT NULL,
            recency_score        REAL NOT NULL,
            retrieval_count      INTEGER NOT NULL DEFAULT 0,
            success_count        INTEGER NOT NULL DEFAULT 0,
            failure_count        INTEGER NOT NULL DEFAULT 0,
            contradiction_flag   INTEGER NOT NULL DEFAULT 0,
            duplicate_cluster_id INTEGER,
            duplicate_score      REAL NOT NULL DEFAULT 0,
            parent_capsule_id    INTEGER,
            lineage_root_id      INTEGER,
            created_from_run_id  INTEGER,
            created_at           TEXT NOT NULL,
            last_accessed_at     TEXT,
            last_used_at         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_capsules_run ON memory_capsules(run_id);
        CREATE INDEX IF NOT EXISTS idx_capsules_layer ON memory_capsules(memory_layer);
        CREATE INDEX IF NOT EXISTS idx_capsules_archive ON memory_capsules(archive_status);
        CREATE INDEX IF NOT EXISTS idx_capsules_parent ON memory_capsules(parent_capsule_id);
        CREATE INDEX IF NOT EXISTS idx_capsules_lineage ON memory_capsules(lineage_root_id);

        CREATE TABLE IF NOT EXISTS capsule_embeddings (
            capsule_id  INTEGER PRIMARY KEY REFERENCES memory_capsules(id),
            vector      BLOB NOT NULL,
            dimensions  INTEGER NOT NULL,
            model       TEXT NOT NULL
        );

        CREATE TRIGGER IF NOT EXISTS capsule_embeddings_immutable
        BEFORE UPDATE ON capsule_embeddings
        BEGIN
            SELECT RAISE(ABORT, 'capsule embeddings are immutable');
        END;

        CREATE TABLE IF NOT EXISTS memory_capsule_state (
            capsule_id        INTEGER PRIMARY KEY REFERENCES memory_capsules(id),
            retrieval_count   INTEGER NOT NULL DEFAULT 0,
            success_count     INTEGER NOT NULL DEFAULT 0,
            failure_count     INTEGER NOT NULL DEFAULT 0,
            last_layer        TEXT NOT NULL,
            last_accessed_at  TEXT,
            updated_at        TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
