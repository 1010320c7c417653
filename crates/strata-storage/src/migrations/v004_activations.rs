//! v004: context activations, usefulness metrics, refinement summaries.

use rusqlite::Connection;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> StrataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS context_activations (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id        INTEGER,
            capsule_id    INTEGER NOT NULL REFERENCES memory_capsules(id),
            query_text    TEXT NOT NULL,
            score         REAL NOT NULL,
            memory_layer  TEXT NOT NULL,
            reason        TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_activations_run ON context_activations(run_id);

        CREATE TABLE IF NOT EXISTS memory_usefulness_metrics (
            run_id                       INTEGER NOT NULL,
            capsule_id                   INTEGER NOT NULL REFERENCES memory_capsules(id),
            retrieved_count              INTEGER NOT NULL DEFAULT 0,
            used_count                   INTEGER NOT NULL DEFAULT 0,
            unused_count                 INTEGER NOT NULL DEFAULT 0,
            helped_final_answer_score    REAL NOT NULL DEFAULT 0,
            helped_tool_execution_score  REAL NOT NULL DEFAULT 0,
            contradiction_penalty        REAL NOT NULL DEFAULT 0,
            stale_penalty                REAL NOT NULL DEFAULT 0,
            confidence_gain              REAL NOT NULL DEFAULT 0,
            updated_at                   TEXT NOT NULL,
            PRIMARY KEY (run_id, capsule_id)
        );

        CREATE TABLE IF NOT EXISTS memory_summaries (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            capsule_id          INTEGER NOT NULL REFERENCES memory_capsules(id),
            summary_capsule_id  INTEGER NOT NULL REFERENCES memory_capsules(id),
            child_ids           TEXT NOT NULL DEFAULT '[]',
            created_at          TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_summaries_capsule ON memory_summaries(capsule_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
