use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::CapsuleId;

/// Capsules whose normalized text hashes to the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    pub id: i64,
    pub hash_key: String,
    /// First capsule seen with this hash.
    pub canonical_capsule_id: CapsuleId,
    pub member_ids: Vec<CapsuleId>,
    pub cluster_size: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DuplicateCluster {
    pub fn has_duplicates(&self) -> bool {
        self.cluster_size > 1
    }
}
