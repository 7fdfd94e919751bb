//! Local feature-hashing embedder.
//!
//! Tokens (lowercase alphanumeric runs) and adjacent-token bigrams are hashed
//! with FNV-1a into `dimension` signed buckets, then L2-normalized. Pure and
//! bit-for-bit deterministic, so it doubles as the test embedder.

use async_trait::async_trait;

use crate::embedding::{Embedder, EmbeddingError};

pub const DEFAULT_HASH_DIMENSION: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            model_id: format!("fnv-hash-{dimension}"),
        }
    }

    /// Synchronous core, also used by tests that need raw vectors.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        let tokens = tokenize(text);
        for token in &tokens {
            self.accumulate(&mut vector, token.as_bytes(), 1.0);
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut vector, bigram.as_bytes(), BIGRAM_WEIGHT);
        }

        normalize(&mut vector);
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        // Top bit picks the sign so collisions tend to cancel rather than pile up.
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        vector.iter_mut().for_each(|x| *x /= magnitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::ranker::cosine_similarity;

    #[test]
    fn test_same_text_same_vector() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(
            embedder.embed_sync("numerical reasoning"),
            embedder.embed_sync("numerical reasoning")
        );
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashEmbedder::new(64);
        assert_eq!(
            embedder.embed_sync("Java, Developer!"),
            embedder.embed_sync("java developer")
        );
    }

    #[test]
    fn test_output_is_unit_length() {
        let embedder = HashEmbedder::new(128);
        let v = embedder.embed_sync("sales manager with negotiation skills");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashEmbedder::new(16);
        let v = embedder.embed_sync("   ");
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_overlapping_texts_score_higher_than_unrelated() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_sync("java developer spring backend");
        let related = embedder.embed_sync("core java programming for backend developer roles");
        let unrelated = embedder.embed_sync("customer service phone etiquette");
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_trait_reports_dimension_and_model() {
        let embedder = HashEmbedder::new(32);
        let v = embedder.embed("hello").await.unwrap();
        assert_eq!(v.len(), embedder.dimension());
        assert_eq!(embedder.model_id(), "fnv-hash-32");
    }
}
