//! Atomic counter updates. Increments happen in SQL so concurrent admissions
//! of the same capsule never lose an update.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use strata_core::capsule::CapsuleId;
use strata_core::errors::{StrataError, StrataResult};
use strata_core::models::FeedbackDelta;

use crate::to_storage_err;

/// `retrieval_count += 1`, recency nudged up (capped at 1), access times set.
pub fn record_retrieval(
    conn: &Connection,
    id: CapsuleId,
    recency_nudge: f64,
    at: DateTime<Utc>,
) -> StrataResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("record_retrieval begin: {e}")))?;
    let at = at.to_rfc3339();

    let changed = tx
        .execute(
            "UPDATE memory_capsules
             SET retrieval_count = retrieval_count + 1,
                 recency_score = MIN(1.0, recency_score + ?2),
                 last_accessed_at = ?3,
                 last_used_at = ?3
             WHERE id = ?1",
            params![id, recency_nudge, at],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(StrataError::CapsuleNotFound { id });
    }
    tx.execute(
        "UPDATE memory_capsule_state
         SET retrieval_count = retrieval_count + 1, last_accessed_at = ?2, updated_at = ?2
         WHERE capsule_id = ?1",
        params![id, at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("record_retrieval commit: {e}")))
}

/// Apply success/failure increments and clamped trust/consolidation deltas.
pub fn apply_feedback(
    conn: &Connection,
    id: CapsuleId,
    delta: &FeedbackDelta,
    at: DateTime<Utc>,
) -> StrataResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("apply_feedback begin: {e}")))?;
    let at = at.to_rfc3339();

    let changed = tx
        .execute(
            "UPDATE memory_capsules
             SET success_count = success_count + ?2,
                 failure_count = failure_count + ?3,
                 trust_score = MAX(0.0, MIN(1.0, trust_score + ?4)),
                 consolidation_score = MAX(0.0, MIN(1.0, consolidation_score + ?5)),
                 last_used_at = CASE WHEN ?2 > 0 THEN ?6 ELSE last_used_at END
             WHERE id = ?1",
            params![
                id,
                delta.success as i64,
                delta.failure as i64,
                delta.trust,
                delta.consolidation,
                at
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if changed == 0 {
        return Err(StrataError::CapsuleNotFound { id });
    }
    tx.execute(
        "UPDATE memory_capsule_state
         SET success_count = success_count + ?2, failure_count = failure_count + ?3,
             updated_at = ?4
         WHERE capsule_id = ?1",
        params![id, delta.success as i64, delta.failure as i64, at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    tx.commit()
        .map_err(|e| to_storage_err(format!("apply_feedback commit: {e}")))
}
