//! # strata-graph
//!
//! Weighted, typed, directed edges between capsules. Edges live in storage
//! as an adjacency index keyed by capsule id; rerank works on a petgraph
//! snapshot of the edges touching the candidate band.

pub mod engine;
pub mod pruning;
pub mod reinforcement;
pub mod rerank;
pub mod snapshot;

pub use engine::{GraphEngine, GraphRerank};
pub use rerank::RerankOutcome;
pub use snapshot::{AffinityEdge, AffinityGraph};
