/// Strata system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of memory layers.
pub const LAYER_COUNT: usize = 6;

/// Job type used when dispatching the maintenance sweep to a worker.
pub const MAINTENANCE_JOB_TYPE: &str = "memory_maintenance";

/// Priority attached to delegated maintenance jobs.
pub const MAINTENANCE_JOB_PRIORITY: u8 = 4;

/// Source-type label for plain ingestion chunks.
pub const SOURCE_TYPE_CHUNK: &str = "chunk";

/// Source-type label for the leading ingestion summary window.
pub const SOURCE_TYPE_SUMMARY: &str = "summary";

/// Source-type label for refinement children.
pub const SOURCE_TYPE_REFINEMENT: &str = "refinement";

/// Source-type label for the refinement summary capsule.
pub const SOURCE_TYPE_REFINEMENT_SUMMARY: &str = "refinement_summary";

/// Maximum number of conflicts returned by a listing.
pub const MAX_CONFLICT_LISTING: usize = 100;

/// Maximum batch size for bulk capsule inserts.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;
