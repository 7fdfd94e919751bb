//! Query Normalizer: turns raw input (text or a job-posting URL) into
//! bounded, whitespace-collapsed plain text ready for embedding.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Url;
use serde::Serialize;
use tracing::debug;

use crate::recommendation::error::{ExtractionError, FetchError, InputError, RecommendError};
use crate::recommendation::fetcher::{FetchedPage, PageFetcher};
use crate::recommendation::html::extract_visible_text;

pub const DEFAULT_MAX_QUERY_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Text,
    Url,
}

#[derive(Debug, Clone)]
pub struct NormalizedQuery {
    pub kind: QueryKind,
    /// At most `max_chars` characters, single-spaced, trimmed.
    pub text: String,
    /// Set for `QueryKind::Url`.
    pub source_url: Option<Url>,
}

pub struct QueryNormalizer {
    fetcher: Arc<dyn PageFetcher>,
    max_chars: usize,
}

impl QueryNormalizer {
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_chars: usize) -> Self {
        Self { fetcher, max_chars }
    }

    pub async fn normalize(&self, raw: &str) -> Result<NormalizedQuery, RecommendError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyQuery.into());
        }

        match classify(trimmed) {
            Some(url) => {
                let page = self.fetcher.fetch(&url).await?;
                let extracted = page_text(page).await?;
                let text = collapse_and_truncate(&extracted, self.max_chars);
                if text.is_empty() {
                    return Err(ExtractionError::NoText.into());
                }
                debug!("URL query {url} resolved to {} chars", text.chars().count());
                Ok(NormalizedQuery {
                    kind: QueryKind::Url,
                    text,
                    source_url: Some(url),
                })
            }
            None => Ok(NormalizedQuery {
                kind: QueryKind::Text,
                text: collapse_and_truncate(trimmed, self.max_chars),
                source_url: None,
            }),
        }
    }
}

/// Returns the URL when the whole input is a single absolute http(s) URL.
/// Anything containing whitespace is prose, even if it starts with a link.
pub fn classify(trimmed: &str) -> Option<Url> {
    if trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    let url = Url::parse(trimmed).ok()?;
    let web = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
    web.then_some(url)
}

/// Collapses whitespace runs to one space and cuts at `max_chars` characters.
pub fn collapse_and_truncate(text: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(text.len().min(max_chars * 4));
    let mut count = 0usize;

    for word in text.split_whitespace() {
        if count > 0 {
            if count + 1 > max_chars {
                break;
            }
            out.push(' ');
            count += 1;
        }
        for c in word.chars() {
            if count == max_chars {
                return out.trim_end().to_string();
            }
            out.push(c);
            count += 1;
        }
    }
    out.trim_end().to_string()
}

async fn page_text(page: FetchedPage) -> Result<String, RecommendError> {
    match page.content_type.as_deref() {
        None | Some("text/html") | Some("application/xhtml+xml") => {
            Ok(extract_visible_text(&String::from_utf8_lossy(&page.body)))
        }
        Some("text/plain") => Ok(String::from_utf8_lossy(&page.body).into_owned()),
        Some("application/pdf") => pdf_text(page.body).await,
        Some(other) => Err(FetchError::UnsupportedContentType(other.to_string()).into()),
    }
}

/// PDF parsing is CPU-bound and can panic on malformed input; run it on the
/// blocking pool so a panic becomes a `JoinError` instead of unwinding here.
async fn pdf_text(body: Bytes) -> Result<String, RecommendError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&body))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("parser aborted: {e}")))?;
    extracted.map_err(|e| ExtractionError::Pdf(e.to_string()).into())
}
