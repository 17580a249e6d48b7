//! In-process vector store with brute-force cosine search.
//!
//! Stands in for a remote vector database during local runs and tests.
//! Upserts are keyed by record id, so re-indexing an unchanged chunk
//! overwrites rather than duplicates.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::UpsertRecord;

use super::vector_store::{ScoredMatch, VectorStoreProvider};

/// In-memory vector store.
pub struct MemoryVectorStore {
    dimensions: usize,
    records: RwLock<HashMap<String, UpsertRecord>>,
}

impl MemoryVectorStore {
    /// Create an empty store expecting vectors of `dimensions` entries.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of all stored record ids, unordered.
    pub fn ids(&self) -> Vec<String> {
        self.records.read().keys().cloned().collect()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStoreProvider for MemoryVectorStore {
    async fn upsert(&self, records: &[UpsertRecord]) -> Result<()> {
        for record in records {
            if record.values.len() != self.dimensions {
                return Err(Error::vector_store(format!(
                    "dimension mismatch for '{}': got {}, expected {}",
                    record.id,
                    record.values.len(),
                    self.dimensions
                )));
            }
        }
        let mut guard = self.records.write();
        for record in records {
            guard.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let guard = self.records.read();
        let mut matches: Vec<ScoredMatch> = guard
            .values()
            .map(|record| ScoredMatch {
                id: record.id.clone(),
                score: cosine(embedding, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
