//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChunkMetadata, UpsertRecord};

/// A scored nearest-neighbor match.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Record id (`{doc_id}-{start}-{end}`)
    pub id: String,
    /// Similarity score, higher is more similar
    pub score: f32,
    /// Metadata stored with the vector
    pub metadata: ChunkMetadata,
}

/// Trait for vector storage with idempotent upserts.
///
/// Upserting an existing id overwrites the stored record; the pipeline
/// relies on this to make re-indexing safe to repeat.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Insert or overwrite a batch of records
    async fn upsert(&self, records: &[UpsertRecord]) -> Result<()>;

    /// Nearest-neighbor query
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>>;

    /// Total number of stored vectors
    async fn len(&self) -> Result<usize>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
