//! Versioned schema migrations. Each step runs in its own transaction and
//! records its version in `schema_version`.

mod v001_capsules;
mod v002_graph;
mod v003_validation;
mod v004_activations;
mod v005_jobs;
mod v006_trace;

use rusqlite::{params, Connection};
use tracing::debug;

use strata_core::errors::{StorageError, StrataResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> StrataResult<()>;

const MIGRATIONS: [(u32, Migration); 6] = [
    (1, v001_capsules::migrate),
    (2, v002_graph::migrate),
    (3, v003_validation::migrate),
    (4, v004_activations::migrate),
    (5, v005_jobs::migrate),
    (6, v006_trace::migrate),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 6;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> StrataResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    for (version, migrate) in MIGRATIONS.iter() {
        if *version <= current {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration {version} begin: {e}")))?;
        let applied = migrate(&tx).and_then(|()| {
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![version],
            )
            .map_err(|e| to_storage_err(e.to_string()))
        });
        match applied {
            Ok(_) => {
                tx.commit().map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
                debug!(version, "applied schema migration");
            }
            Err(e) => {
                return Err(StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                }
                .into());
            }
        }
    }
    current_version(conn)
}

/// Highest applied schema version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> StrataResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
