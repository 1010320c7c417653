use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CapsuleId, MemoryLayer};

/// Per-capsule counter rollup, kept in step with the capsule's own counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCapsuleState {
    pub capsule_id: CapsuleId,
    pub retrieval_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_layer: MemoryLayer,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
