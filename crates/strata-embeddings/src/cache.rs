//! In-memory query embedding cache using moka.
//!
//! TinyLFU admission, capacity-bounded eviction, idle TTL. Only query
//! vectors are cached; capsule vectors live in the store.

use std::time::Duration;

use moka::sync::Cache;

/// Query embedding cache keyed by blake3 of the query text.
pub struct QueryCache {
    cache: Cache<String, Vec<f32>>,
}

impl QueryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Cache key for a query string.
    pub fn key_for(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
