use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::CapsuleId;

/// Links a refined parent to the summary and children derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub id: i64,
    pub capsule_id: CapsuleId,
    pub summary_capsule_id: CapsuleId,
    pub child_ids: Vec<CapsuleId>,
    pub created_at: DateTime<Utc>,
}
