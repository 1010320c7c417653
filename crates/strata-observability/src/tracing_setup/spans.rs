//! Span definitions per operation: retrieval, maintenance, ingestion.

/// Create a retrieval span.
#[macro_export]
macro_rules! retrieval_span {
    ($run_id:expr, $top_k:expr) => {
        tracing::info_span!("strata.retrieval", run_id = ?$run_id, top_k = $top_k)
    };
}

/// Create a maintenance span.
#[macro_export]
macro_rules! maintenance_span {
    ($run_id:expr) => {
        tracing::info_span!("strata.maintenance", run_id = ?$run_id)
    };
}

/// Create an ingestion span.
#[macro_export]
macro_rules! ingest_span {
    ($run_id:expr, $source:expr) => {
        tracing::info_span!("strata.ingest", run_id = $run_id, source = %$source)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETRIEVAL: &str = "strata.retrieval";
    pub const MAINTENANCE: &str = "strata.maintenance";
    pub const INGEST: &str = "strata.ingest";
}
