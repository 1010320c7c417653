use crate::errors::StrataResult;

/// Turns text into vectors. Failures are hard errors for ingestion and queries.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> StrataResult<Vec<f32>>;

    /// Embed a batch of texts in one provider call. Output order matches input.
    fn embed_batch(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}
