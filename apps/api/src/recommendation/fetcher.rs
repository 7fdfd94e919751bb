//! Page fetch capability used for URL queries.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Url};
use tracing::debug;

use crate::recommendation::error::FetchError;

/// Hard cap on a fetched body. Job postings are far smaller.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

const ACCEPT: &str = "text/html,application/xhtml+xml,text/plain;q=0.9,application/pdf;q=0.8";
const USER_AGENT: &str = concat!("assessment-recommender/", env!("CARGO_PKG_VERSION"));

/// A successfully retrieved (2xx) resource.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Lowercased media type without parameters, e.g. `text/html`.
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// `reqwest`-backed fetcher with a whole-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            timeout,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_BODY_BYTES {
                return Err(FetchError::BodyTooLarge(MAX_BODY_BYTES));
            }
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type);

        // Chunked responses carry no length up front; stop reading at the cap.
        let mut buf = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if buf.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(FetchError::BodyTooLarge(MAX_BODY_BYTES));
            }
            buf.extend_from_slice(&chunk);
        }
        let body = Bytes::from(buf);

        debug!(
            "Fetched {url}: {} bytes, content-type {:?}",
            body.len(),
            content_type
        );
        Ok(FetchedPage { content_type, body })
    }
}

/// `Text/HTML; charset=utf-8` → `text/html`
fn media_type(header_value: &str) -> String {
    header_value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
