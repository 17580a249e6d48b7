//! Order-preserving concurrent embedding.

use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingMode, EmbeddingProvider};

/// Embeds batches of chunk texts, optionally fanning out over a bounded
/// number of in-flight requests.
///
/// Output order always equals input order: concurrent results are written
/// into preallocated slots addressed by original index, never appended, so
/// completion timing cannot reorder vectors.
pub struct EmbeddingExecutor {
    provider: Arc<dyn EmbeddingProvider>,
    concurrency: usize,
}

impl EmbeddingExecutor {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    /// Embed `texts` in document mode, one vector per input.
    ///
    /// Fail-fast: the first failed request aborts the whole batch and
    /// cancels remaining in-flight requests, so partial batches never reach
    /// the store.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if self.concurrency <= 1 {
            // Backend-native batching: one call with the whole batch.
            let vectors = self.provider.embed(texts, EmbeddingMode::Document).await?;
            if vectors.len() != texts.len() {
                return Err(Error::embedding(format!(
                    "backend returned {} vectors for {} inputs",
                    vectors.len(),
                    texts.len()
                )));
            }
            return Ok(vectors);
        }

        let mut slots: Vec<Option<Vec<f32>>> = vec![None; texts.len()];

        let mut results = stream::iter(texts.iter().cloned().enumerate().map(|(index, text)| {
            let provider = Arc::clone(&self.provider);
            async move {
                let vectors = provider
                    .embed(std::slice::from_ref(&text), EmbeddingMode::Document)
                    .await?;
                let vector = vectors
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::embedding("backend returned no vector"))?;
                Ok::<_, Error>((index, vector))
            }
        }))
        .buffer_unordered(self.concurrency);

        while let Some(result) = results.next().await {
            let (index, vector) = result?;
            slots[index] = Some(vector);
        }
        drop(results);

        // Every index completed exactly once; a hole here is a bug, not a
        // recoverable condition.
        Ok(slots
            .into_iter()
            .map(|slot| slot.expect("embedding slot filled"))
            .collect())
    }
}
