//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Whether a text is embedded as an indexed passage or a search query.
///
/// Some backends (E5-family models) expect a different prefix per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    Document,
    Query,
}

/// Trait for turning text into fixed-length vectors.
///
/// Implementations:
/// - [`OllamaEmbedder`](super::OllamaEmbedder): HTTP backend
/// - mock embedders in tests
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in input
    /// order. All vectors have [`dimensions`](Self::dimensions) entries.
    async fn embed(&self, texts: &[String], mode: EmbeddingMode) -> Result<Vec<Vec<f32>>>;

    /// Fixed embedding dimension for this backend
    fn dimensions(&self) -> usize;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
