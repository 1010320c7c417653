use crate::capsule::CapsuleId;

/// Reinforcement graph errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid edge {from} -> {to}: self-edges are not allowed")]
    InvalidEdge { from: CapsuleId, to: CapsuleId },

    #[error("unknown edge type: {name}")]
    UnknownEdgeType { name: String },
}
