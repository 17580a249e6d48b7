//! Nearest-neighbor search over indexed chunks.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingMode, EmbeddingProvider, ScoredMatch, VectorStoreProvider};

/// Thin query wrapper: embed the question in query mode, then ask the
/// vector store for the closest chunks.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self { embedder, store }
    }

    /// Return the `top_k` chunks closest to `query`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredMatch>> {
        let query_text = [query.to_string()];
        let vectors = self.embedder.embed(&query_text, EmbeddingMode::Query).await?;
        let embedding = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("backend returned no vector for the query"))?;
        self.store.query(&embedding, top_k).await
    }
}
