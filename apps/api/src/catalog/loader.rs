//! Catalog file loader.
//!
//! Accepts either a bare JSON array of records or `{"assessments": [...]}`.
//! Records without an `embedding` are embedded here, once, with the same
//! embedder that serves queries.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::{CatalogError, CatalogSnapshot};
use crate::embedding::{Embedder, EmbeddingError};
use crate::models::assessment::Assessment;

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    /// Falls back to `url` when absent.
    #[serde(default)]
    id: Option<String>,
    name: String,
    url: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "testType")]
    test_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

impl CatalogRecord {
    fn embedding_text(&self) -> String {
        [
            Some(self.name.as_str()),
            self.category.as_deref(),
            self.test_type.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { assessments: Vec<CatalogRecord> },
    Bare(Vec<CatalogRecord>),
}

impl CatalogFile {
    fn into_records(self) -> Vec<CatalogRecord> {
        match self {
            CatalogFile::Wrapped { assessments } => assessments,
            CatalogFile::Bare(records) => records,
        }
    }
}

/// Reads, embeds (where needed) and validates the catalog at `path`.
/// Each embed call is bounded by `embed_timeout`.
pub async fn load_catalog(
    path: impl AsRef<Path>,
    embedder: &dyn Embedder,
    embed_timeout: Duration,
) -> Result<CatalogSnapshot, CatalogError> {
    let path = path.as_ref();
    let path_name = path.display().to_string();
    info!("Loading catalog from {path_name}");

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path_name.clone(),
            source,
        })?;

    parse_catalog(&raw, &path_name, embedder, embed_timeout).await
}

/// Same as `load_catalog`, from an in-memory JSON document.
pub async fn parse_catalog(
    raw: &str,
    source_name: &str,
    embedder: &dyn Embedder,
    embed_timeout: Duration,
) -> Result<CatalogSnapshot, CatalogError> {
    let file: CatalogFile = serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
        path: source_name.to_string(),
        source,
    })?;
    let records = file.into_records();

    let mut assessments = Vec::with_capacity(records.len());
    let mut embedded_here = 0usize;

    for record in records {
        let id = record.id.clone().unwrap_or_else(|| record.url.clone());
        let embedding = match record.embedding.clone() {
            Some(embedding) => embedding,
            None => {
                embedded_here += 1;
                tokio::time::timeout(embed_timeout, embedder.embed(&record.embedding_text()))
                    .await
                    .unwrap_or(Err(EmbeddingError::Timeout(embed_timeout)))
                    .map_err(|e| CatalogError::Embedding {
                        id: id.clone(),
                        reason: e.to_string(),
                    })?
            }
        };

        assessments.push(Assessment {
            id,
            name: record.name,
            url: record.url,
            category: record.category,
            test_type: record.test_type,
            embedding,
        });
    }

    if embedded_here > 0 {
        warn!(
            "{embedded_here} catalog entries had no precomputed embedding; embedded with '{}'",
            embedder.model_id()
        );
    }

    let snapshot = CatalogSnapshot::new(assessments, embedder.model_id())?;

    // Query vectors come from `embedder`, so the catalog must live in the same space.
    if snapshot.dimension() != embedder.dimension() {
        return Err(CatalogError::DimensionMismatch {
            id: snapshot.assessments()[0].id.clone(),
            expected: embedder.dimension(),
            actual: snapshot.dimension(),
        });
    }

    info!(
        "Catalog loaded: {} assessments, dimension {}",
        snapshot.len(),
        snapshot.dimension()
    );
    Ok(snapshot)
}
