//! # strata-core
//!
//! Foundation crate for the Strata layered memory engine.
//! Defines capsule types, records, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod capsule;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use capsule::{
    ArchiveStatus, Capsule, CapsuleEmbedding, CapsuleId, DecayClass, MemoryCapsuleState,
    MemoryLayer, NewCapsule, RunId,
};
pub use config::StrataConfig;
pub use errors::{StrataError, StrataResult};
