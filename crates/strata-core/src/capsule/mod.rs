//! Capsules: the unit of retrievable memory, with their layer, decay class,
//! archive status, embedding, and counter rollup.

mod archive_status;
mod base;
mod decay_class;
mod embedding;
mod layer;
mod state;

pub use archive_status::ArchiveStatus;
pub use base::{Capsule, NewCapsule};
pub use decay_class::DecayClass;
pub use embedding::CapsuleEmbedding;
pub use layer::MemoryLayer;
pub use state::MemoryCapsuleState;

/// Stable integer id of a capsule (SQLite rowid).
pub type CapsuleId = i64;

/// Id of the run that owns a capsule or a retrieval.
pub type RunId = i64;
