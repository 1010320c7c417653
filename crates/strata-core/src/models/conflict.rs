use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capsule::CapsuleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStatus {
    Open,
    Resolved,
}

impl ConflictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictStatus::Open => "open",
            ConflictStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s == "resolved" {
            ConflictStatus::Resolved
        } else {
            ConflictStatus::Open
        }
    }
}

/// A likely contradiction between two capsules. Unique per ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConflict {
    pub id: i64,
    pub left_capsule_id: CapsuleId,
    pub right_capsule_id: CapsuleId,
    pub conflict_score: f64,
    pub status: ConflictStatus,
    pub detail: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
