//! # strata-embeddings
//!
//! Turns text into vectors for ingestion and queries.
//!
//! ```text
//! EmbeddingEngine
//! ├── provider (one, chosen by config)
//! │   ├── HashingProvider (offline, deterministic)
//! │   └── OllamaProvider  (HTTP, feature "http")
//! └── QueryCache (moka, keyed by blake3 of the query)
//! ```
//!
//! There is no silent fallback between providers: a provider failure is an
//! `EmbeddingUnavailable` error and the caller fails closed.

pub mod cache;
pub mod engine;
pub mod providers;

pub use cache::QueryCache;
pub use engine::EmbeddingEngine;
pub use providers::HashingProvider;
#[cfg(feature = "http")]
pub use providers::OllamaProvider;
