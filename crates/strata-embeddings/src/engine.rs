//! EmbeddingEngine: provider plus query cache, with batch and dimension
//! validation.

use strata_core::config::EmbeddingConfig;
use strata_core::errors::{EmbeddingError, StrataResult};
use strata_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::QueryCache;
use crate::providers;

pub struct EmbeddingEngine {
    provider: Box<dyn IEmbeddingProvider>,
    cache: QueryCache,
}

impl EmbeddingEngine {
    /// Build from config.
    pub fn new(config: &EmbeddingConfig) -> StrataResult<Self> {
        let provider = providers::create_provider(config)?;
        info!(
            provider = provider.name(),
            dims = provider.dimensions(),
            "embedding engine initialized"
        );
        Ok(Self::with_provider(provider, config.query_cache_capacity))
    }

    /// Wrap an existing provider.
    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, cache_capacity: u64) -> Self {
        Self {
            provider,
            cache: QueryCache::new(cache_capacity),
        }
    }

    /// Label stored next to each capsule vector.
    pub fn model_label(&self) -> String {
        format!("{}-{}", self.provider.name(), self.provider.dimensions())
    }

    /// Embed a query string, served from cache when possible.
    pub fn embed_query(&self, query: &str) -> StrataResult<Vec<f32>> {
        let key = QueryCache::key_for(query);
        if let Some(vec) = self.cache.get(&key) {
            debug!("query embedding cache hit");
            return Ok(vec);
        }
        let vec = self.provider.embed(query)?;
        self.check_dimensions(&vec)?;
        self.cache.insert(key, vec.clone());
        Ok(vec)
    }

    /// Embed capsule texts in one provider call. Output order matches input.
    pub fn embed_documents(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.provider.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::BatchMismatch {
                sent: texts.len(),
                received: vectors.len(),
            }
            .into());
        }
        for v in &vectors {
            self.check_dimensions(v)?;
        }
        Ok(vectors)
    }

    fn check_dimensions(&self, v: &[f32]) -> StrataResult<()> {
        let expected = self.provider.dimensions();
        if v.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: v.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> StrataResult<Vec<f32>> {
        self.embed_query(text)
    }

    fn embed_batch(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        self.embed_documents(texts)
    }

    fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_engine() -> EmbeddingEngine {
        EmbeddingEngine::new(&EmbeddingConfig {
            dimensions: 32,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn query_has_configured_dims() {
        assert_eq!(small_engine().embed_query("query").unwrap().len(), 32);
    }

    #[test]
    fn cached_query_matches_fresh() {
        let engine = small_engine();
        let first = engine.embed_query("repeat me").unwrap();
        let second = engine.embed_query("repeat me").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn model_label_includes_dims() {
        assert_eq!(small_engine().model_label(), "hashing-32");
    }

    #[test]
    fn empty_document_batch() {
        assert!(small_engine().embed_documents(&[]).unwrap().is_empty());
    }
}
