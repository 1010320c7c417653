//! v002: reinforcement graph edges.

use rusqlite::Connection;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> StrataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_edges (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            from_capsule_id     INTEGER NOT NULL REFERENCES memory_capsules(id),
            to_capsule_id       INTEGER NOT NULL REFERENCES memory_capsules(id),
            edge_type           TEXT NOT NULL,
            weight              REAL NOT NULL,
            confidence          REAL NOT NULL,
            trust_score         REAL NOT NULL,
            usage_count         INTEGER NOT NULL DEFAULT 1,
            created_at          TEXT NOT NULL,
            last_reinforced_at  TEXT NOT NULL,
            CHECK (from_capsule_id <> to_capsule_id),
            UNIQUE (from_capsule_id, to_capsule_id, edge_type)
        );

        CREATE INDEX IF NOT EXISTS idx_edges_from ON memory_edges(from_capsule_id);
        CREATE INDEX IF NOT EXISTS idx_edges_to ON memory_edges(to_capsule_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
