//! # strata-ingest
//!
//! Turns raw text into capsules: whitespace normalization, overlapping
//! windows, an optional leading summary window, initial layer and decay
//! class, and one batched embedding call per document.

pub mod chunker;
pub mod engine;
pub mod layer_policy;

pub use chunker::PlannedChunk;
pub use engine::{IngestEngine, IngestOutcome, IngestRequest};
pub use layer_policy::LayerPolicy;
