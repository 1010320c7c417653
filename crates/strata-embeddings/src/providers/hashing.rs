//! Deterministic hashing provider.
//!
//! Hashes terms into fixed-dimension signed buckets weighted by term
//! frequency. No model, no network: the same text always yields the same
//! vector, which is what offline runs and tests need.

use std::collections::HashMap;

use strata_core::errors::StrataResult;
use strata_core::traits::IEmbeddingProvider;

/// Feature-hashing embedding provider.
pub struct HashingProvider {
    dimensions: usize,
}

impl HashingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Bucket index and sign for a term.
    fn bucket(term: &str, dims: usize) -> (usize, f32) {
        let hash = blake3::hash(term.as_bytes());
        let bytes = hash.as_bytes();
        let mut idx = [0u8; 8];
        idx.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(idx) % dims as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }

    /// Lowercase alphanumeric terms of two or more characters.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            // Longer terms carry more signal than short function words.
            let idf = 1.0 + (term.len() as f32).ln();
            let (bucket, sign) = Self::bucket(term, self.dimensions);
            vec[bucket] += sign * (count / total) * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for HashingProvider {
    fn embed(&self, text: &str) -> StrataResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> StrataResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }

    fn is_available(&self) -> bool {
        true
    }
}
