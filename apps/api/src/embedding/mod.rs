//! Embedding capability: maps text to a fixed-dimension vector.
//!
//! The engine only sees `Arc<dyn Embedder>`. Backends:
//! - `OllamaEmbedder` (HTTP, the default provider)
//! - `HashEmbedder` (local feature hashing, deterministic, no network)

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod hashing;
pub mod ollama;

pub use hashing::HashEmbedder;
pub use ollama::OllamaEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider unreachable: {0}")]
    Unreachable(String),

    #[error("embedding provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("embedding call timed out after {0:?}")]
    Timeout(Duration),

    #[error("embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding contains a non-finite value at index {0}")]
    NonFinite(usize),

    #[error("embedding provider returned no vector")]
    Empty,

    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// The embedding trait. Same text and same `model_id` must yield the same
/// vector within floating-point tolerance.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension D of every vector this embedder returns.
    fn dimension(&self) -> usize;

    fn model_id(&self) -> &str;
}

/// Rejects vectors of the wrong dimension or with NaN/inf components.
pub fn validate_embedding(vector: &[f32], expected: usize) -> Result<(), EmbeddingError> {
    if vector.is_empty() {
        return Err(EmbeddingError::Empty);
    }
    if vector.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::NonFinite(index));
    }
    Ok(())
}
