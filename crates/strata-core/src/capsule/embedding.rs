use serde::{Deserialize, Serialize};

use super::CapsuleId;

/// The vector stored alongside a capsule. Written once at creation, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleEmbedding {
    pub capsule_id: CapsuleId,
    pub vector: Vec<f32>,
    pub dimensions: usize,
    /// Name of the provider that produced the vector.
    pub model: String,
}
