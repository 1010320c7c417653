//! # strata-scoring
//!
//! Ranks candidate capsules for a query. Six positive factors are blended
//! with fixed weights, penalties are subtracted after the blend, and the
//! result is scaled by the capsule's layer weight and floored at zero.

pub mod engine;
pub mod factors;
pub mod formula;

pub use engine::{ScoredCapsule, ScoringEngine};
pub use factors::QueryContext;
