//! Catalog Store: the immutable assessment snapshot and its holder.
//!
//! A `CatalogSnapshot` is validated once at construction and never mutated.
//! `CatalogStore` swaps whole snapshots atomically; readers never take a lock.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use reqwest::Url;
use thiserror::Error;

use crate::models::assessment::Assessment;

pub mod loader;
pub mod store;

pub use loader::load_catalog;
pub use store::CatalogStore;

/// Load-time catalog failures. All of them are fatal configuration errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("assessment '{id}' has embedding dimension {actual}, expected {expected}")]
    DimensionMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate assessment id '{0}'")]
    DuplicateId(String),

    #[error("assessment '{0}' has an empty name")]
    EmptyName(String),

    #[error("assessment '{id}' has an invalid url '{url}'")]
    InvalidUrl { id: String, url: String },

    #[error("assessment '{0}' has a non-finite embedding value")]
    NonFiniteEmbedding(String),

    #[error("failed to embed assessment '{id}': {reason}")]
    Embedding { id: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Point-in-time, read-only view of the catalog. Entries keep insertion order,
/// which the ranker relies on for tie-breaking.
#[derive(Debug)]
pub struct CatalogSnapshot {
    assessments: Vec<Assessment>,
    dimension: usize,
    model: String,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    /// Validates every catalog invariant. The dimension D is taken from the
    /// first entry; every other entry must match it.
    pub fn new(
        assessments: Vec<Assessment>,
        model: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let first = assessments.first().ok_or(CatalogError::Empty)?;
        let dimension = first.embedding.len();
        if dimension == 0 {
            return Err(CatalogError::DimensionMismatch {
                id: first.id.clone(),
                expected: 1,
                actual: 0,
            });
        }

        let mut seen = HashSet::with_capacity(assessments.len());
        for assessment in &assessments {
            validate_entry(assessment, dimension)?;
            if !seen.insert(assessment.id.as_str()) {
                return Err(CatalogError::DuplicateId(assessment.id.clone()));
            }
        }

        Ok(Self {
            assessments,
            dimension,
            model: model.into(),
            loaded_at: Utc::now(),
        })
    }

    pub fn assessments(&self) -> &[Assessment] {
        &self.assessments
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn validate_entry(assessment: &Assessment, dimension: usize) -> Result<(), CatalogError> {
    if assessment.name.trim().is_empty() {
        return Err(CatalogError::EmptyName(assessment.id.clone()));
    }

    let url_ok = Url::parse(&assessment.url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false);
    if !url_ok {
        return Err(CatalogError::InvalidUrl {
            id: assessment.id.clone(),
            url: assessment.url.clone(),
        });
    }

    if assessment.embedding.len() != dimension {
        return Err(CatalogError::DimensionMismatch {
            id: assessment.id.clone(),
            expected: dimension,
            actual: assessment.embedding.len(),
        });
    }
    if assessment.embedding.iter().any(|v| !v.is_finite()) {
        return Err(CatalogError::NonFiniteEmbedding(assessment.id.clone()));
    }
    Ok(())
}
