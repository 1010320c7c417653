//! Query modules. Each function takes a `&Connection` so the engine decides
//! whether it runs on the writer or a reader.

pub mod activation_ops;
pub mod capsule_crud;
pub mod capsule_query;
pub mod conflict_ops;
pub mod counters;
pub mod duplicate_ops;
pub mod edge_ops;
pub mod embedding_codec;
pub mod job_ops;
pub mod rows;
pub mod trace_ops;
