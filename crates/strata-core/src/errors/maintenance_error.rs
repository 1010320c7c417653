use crate::capsule::CapsuleId;

/// Lifecycle maintenance errors.
#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error("a maintenance sweep is already in progress")]
    AlreadyRunning,

    #[error("corrupt lineage on capsule {id}: {reason}")]
    CorruptLineage { id: CapsuleId, reason: String },

    #[error("refinement of capsule {id} failed: {reason}")]
    RefinementFailed { id: CapsuleId, reason: String },
}
