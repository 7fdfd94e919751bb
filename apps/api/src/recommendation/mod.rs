// Recommendation Engine
// Implements: query normalization (incl. URL fetch + text extraction),
// embedding, cosine ranking over the catalog snapshot, result assembly.
// The embedder and page fetcher are injected; nothing here talks to a
// provider directly.

pub mod assembler;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod handlers;
pub mod html;
pub mod normalizer;
pub mod ranker;

pub use engine::{EngineSettings, RecommendationEngine};
