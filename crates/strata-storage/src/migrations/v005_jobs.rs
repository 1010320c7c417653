//! v005: maintenance jobs, worker jobs, worker registry.

use rusqlite::Connection;

use strata_core::errors::StrataResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> StrataResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_maintenance_jobs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id       INTEGER,
            job_type     TEXT NOT NULL,
            status       TEXT NOT NULL,
            used_worker  INTEGER NOT NULL DEFAULT 0,
            details      TEXT NOT NULL DEFAULT '{}',
            error        TEXT,
            started_at   TEXT NOT NULL,
            finished_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS worker_jobs (
            id                   INTEGER PRIMARY KEY AUTOINCREMENT,
            job_type             TEXT NOT NULL,
            payload              TEXT NOT NULL,
            priority             INTEGER NOT NULL,
            status               TEXT NOT NULL,
            result               TEXT,
            error                TEXT,
            used_fallback_local  INTEGER NOT NULL DEFAULT 0,
            created_at           TEXT NOT NULL,
            finished_at          TEXT
        );

        CREATE TABLE IF NOT EXISTS worker_nodes (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL UNIQUE,
            url            TEXT NOT NULL,
            capabilities   TEXT NOT NULL DEFAULT '[]',
            registered_at  TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
