use std::time::Duration;

use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Caller-correctable input problems. Surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("query cannot be empty")]
    EmptyQuery,

    #[error("top_k must be a positive integer, got {0}")]
    InvalidTopK(i64),

    /// The request body was not valid JSON or did not match the request shape.
    #[error("invalid request body: {0}")]
    MalformedBody(String),
}

/// The URL query could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),

    #[error("response body exceeds {0} bytes")]
    BodyTooLarge(usize),
}

/// The URL was retrieved but yielded no usable text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no extractable text in the page")]
    NoText,

    #[error("failed to read PDF: {0}")]
    Pdf(String),
}

/// Everything `recommend` can fail with. A request either returns a full
/// (possibly empty) list or exactly one of these.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
