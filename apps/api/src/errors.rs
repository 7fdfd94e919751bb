use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::embedding::EmbeddingError;
use crate::recommendation::error::{ExtractionError, FetchError, InputError, RecommendError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] InputError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<RecommendError> for AppError {
    fn from(e: RecommendError) -> Self {
        match e {
            RecommendError::Input(e) => AppError::Validation(e),
            RecommendError::Fetch(e) => AppError::Fetch(e),
            RecommendError::Extraction(e) => AppError::Extraction(e),
            RecommendError::Embedding(e) => AppError::Embedding(e),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Fetch(e) => {
                tracing::warn!("URL fetch failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "URL_FETCH_ERROR",
                    format!("Could not retrieve content from the provided URL: {e}"),
                )
            }
            AppError::Extraction(e) => {
                tracing::warn!("URL extraction failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "URL_EXTRACTION_ERROR",
                    format!("Could not retrieve content from the provided URL: {e}"),
                )
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "EMBEDDING_UNAVAILABLE",
                    "The recommendation service is temporarily unavailable".to_string(),
                )
            }
            AppError::Catalog(e) => {
                tracing::error!("Catalog error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CATALOG_ERROR",
                    format!("Catalog could not be loaded: {e}"),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_bad_request_verbatim() {
        let (status, code, message) =
            AppError::from(RecommendError::from(InputError::EmptyQuery)).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "query cannot be empty");
    }

    #[test]
    fn test_fetch_errors_mention_url() {
        let (status, code, message) = AppError::from(FetchError::Status(404)).parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "URL_FETCH_ERROR");
        assert!(message.contains("provided URL"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_extraction_errors_use_distinct_code() {
        let (_, code, message) = AppError::from(ExtractionError::NoText).parts();
        assert_eq!(code, "URL_EXTRACTION_ERROR");
        assert!(message.contains("provided URL"));
    }

    #[test]
    fn test_embedding_errors_hide_detail() {
        let (status, code, message) =
            AppError::from(EmbeddingError::Unreachable("connection refused".into())).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "EMBEDDING_UNAVAILABLE");
        assert!(!message.contains("connection refused"));
    }

    #[test]
    fn test_catalog_errors_are_internal() {
        let (status, code, _) = AppError::from(CatalogError::Empty).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "CATALOG_ERROR");
    }
}
