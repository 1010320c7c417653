//! # strata-validation
//!
//! Contradiction scoring between capsules, bounded-window conflict detection
//! per run, and canonical-hash duplicate clusters with retrieval-time
//! suppression.

pub mod canonical;
pub mod contradiction;
pub mod duplicates;
pub mod engine;

pub use contradiction::{ContradictionClassifier, ContradictionScore, HeuristicClassifier};
pub use duplicates::DuplicateAssignment;
pub use engine::ValidationEngine;
