//! # strata-retrieval
//!
//! The query path: score every active candidate, band by layer, rerank the
//! band through the reinforcement graph, suppress duplicate text, then admit
//! greedily under per-layer budgets and a global cap. Admission is the only
//! place retrieval counters move.
//!
//! Also hosts usefulness feedback, which closes the loop from a run's answer
//! back to capsule trust and consolidation.

pub mod admission;
pub mod banding;
pub mod engine;
pub mod feedback;
pub mod query;

pub use admission::{AdmissionController, AdmittedCandidate, RankedCandidate};
pub use engine::RetrievalEngine;
pub use feedback::{FeedbackRecorder, FeedbackRequest};
pub use query::{CapsuleMatch, RetrievedItem, SearchRequest};
