use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::embedding::hashing::DEFAULT_HASH_DIMENSION;
use crate::embedding::ollama::{
    DEFAULT_OLLAMA_DIMENSION, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL,
};
use crate::recommendation::engine::DEFAULT_TOP_K;
use crate::recommendation::normalizer::DEFAULT_MAX_QUERY_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    Ollama,
    Hash,
}

impl FromStr for EmbeddingProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "hash" => Ok(Self::Hash),
            other => bail!("EMBEDDING_PROVIDER must be 'ollama' or 'hash', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: String,
    pub port: u16,
    pub rust_log: String,
    pub embedding_provider: EmbeddingProvider,
    pub ollama_url: String,
    pub embedding_model: String,
    pub embedding_dim: usize,
    pub embed_timeout: Duration,
    pub fetch_timeout: Duration,
    pub max_query_chars: usize,
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub min_score: Option<f32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let embedding_provider =
            parse_or(&lookup, "EMBEDDING_PROVIDER", EmbeddingProvider::Ollama)?;
        let default_dim = match embedding_provider {
            EmbeddingProvider::Ollama => DEFAULT_OLLAMA_DIMENSION,
            EmbeddingProvider::Hash => DEFAULT_HASH_DIMENSION,
        };

        let config = Config {
            catalog_path: lookup("CATALOG_PATH")
                .context("Required environment variable 'CATALOG_PATH' is not set")?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_provider,
            ollama_url: lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            embedding_model: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            embedding_dim: parse_or(&lookup, "EMBEDDING_DIM", default_dim)?,
            embed_timeout: Duration::from_secs(parse_or(&lookup, "EMBED_TIMEOUT_SECS", 30)?),
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 10)?),
            max_query_chars: parse_or(&lookup, "MAX_QUERY_CHARS", DEFAULT_MAX_QUERY_CHARS)?,
            default_top_k: parse_or(&lookup, "DEFAULT_TOP_K", DEFAULT_TOP_K)?,
            max_top_k: parse_or(&lookup, "MAX_TOP_K", DEFAULT_TOP_K)?,
            min_score: lookup("MIN_SCORE")
                .map(|v| v.parse::<f32>())
                .transpose()
                .context("MIN_SCORE must be a number")?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            bail!("EMBEDDING_DIM must be positive");
        }
        if self.max_query_chars == 0 {
            bail!("MAX_QUERY_CHARS must be positive");
        }
        if self.default_top_k == 0 || self.max_top_k == 0 {
            bail!("DEFAULT_TOP_K and MAX_TOP_K must be positive");
        }
        if self.default_top_k > self.max_top_k {
            bail!(
                "DEFAULT_TOP_K ({}) cannot exceed MAX_TOP_K ({})",
                self.default_top_k,
                self.max_top_k
            );
        }
        if self.embed_timeout.is_zero() || self.fetch_timeout.is_zero() {
            bail!("EMBED_TIMEOUT_SECS and FETCH_TIMEOUT_SECS must be positive");
        }
        if let Some(min) = self.min_score {
            if !(-1.0..=1.0).contains(&min) {
                bail!("MIN_SCORE must be within [-1, 1], got {min}");
            }
        }
        Ok(())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}
