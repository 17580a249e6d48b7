//! Bounded producer/consumer stage between embedding and storage.
//!
//! A small bounded channel sits between the orchestrator and a single
//! consumer task performing the storage upsert. `send` blocks once the
//! channel is full, so peak memory stays bounded when storage latency lags
//! embedding throughput. Shutdown is signalled by closing the channel;
//! [`UpsertPipeline::finish`] drains the consumer and surfaces its result,
//! and callers commit the manifest only after it returns Ok.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::providers::VectorStoreProvider;
use crate::types::UpsertRecord;

/// Per-document upsert stage: one bounded queue, one consumer task.
pub struct UpsertPipeline {
    tx: mpsc::Sender<Vec<UpsertRecord>>,
    consumer: JoinHandle<Result<usize>>,
}

impl UpsertPipeline {
    /// Spawn the consumer with a queue of `depth` batches.
    pub fn spawn(store: Arc<dyn VectorStoreProvider>, depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<Vec<UpsertRecord>>(depth.max(1));
        let consumer = tokio::spawn(async move {
            let mut total = 0usize;
            while let Some(batch) = rx.recv().await {
                store.upsert(&batch).await?;
                total += batch.len();
            }
            Ok(total)
        });
        Self { tx, consumer }
    }

    /// Queue a batch, blocking while the channel is at capacity.
    ///
    /// Fails when the consumer has already stopped (after an upsert
    /// error); the underlying cause is reported by [`finish`](Self::finish).
    pub async fn send(&self, batch: Vec<UpsertRecord>) -> Result<()> {
        self.tx
            .send(batch)
            .await
            .map_err(|_| Error::pipeline("upsert consumer stopped early"))
    }

    /// Close the queue, wait for the consumer to drain, and return the
    /// total number of records upserted.
    pub async fn finish(self) -> Result<usize> {
        drop(self.tx);
        self.consumer
            .await
            .map_err(|e| Error::pipeline(format!("upsert consumer panicked: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;
    use async_trait::async_trait;
    use crate::providers::ScoredMatch;
    use parking_lot::Mutex;

    fn record(id: &str) -> UpsertRecord {
        UpsertRecord {
            id: id.to_string(),
            values: vec![1.0],
            metadata: ChunkMetadata {
                doc_id: "doc".into(),
                source_path: "doc.txt".into(),
                section_title: String::new(),
                article: String::new(),
                start: 0,
                end: 1,
                text: "t".into(),
            },
        }
    }

    /// Records the id order of everything upserted; optionally fails after
    /// a number of batches.
    struct RecordingStore {
        seen: Mutex<Vec<String>>,
        fail_after_batches: Option<usize>,
        batches: Mutex<usize>,
    }

    impl RecordingStore {
        fn new(fail_after_batches: Option<usize>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                fail_after_batches,
                batches: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl VectorStoreProvider for RecordingStore {
        async fn upsert(&self, records: &[UpsertRecord]) -> Result<()> {
            let mut batches = self.batches.lock();
            if let Some(limit) = self.fail_after_batches {
                if *batches >= limit {
                    return Err(Error::vector_store("storage outage"));
                }
            }
            *batches += 1;
            self.seen
                .lock()
                .extend(records.iter().map(|r| r.id.clone()));
            Ok(())
        }

        async fn query(&self, _: &[f32], _: usize) -> Result<Vec<ScoredMatch>> {
            Ok(Vec::new())
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.seen.lock().len())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn batches_are_upserted_in_send_order() {
        let store = Arc::new(RecordingStore::new(None));
        let pipeline = UpsertPipeline::spawn(store.clone(), 2);

        for batch_no in 0..5 {
            let batch = vec![record(&format!("doc-{batch_no}-a")), record(&format!("doc-{batch_no}-b"))];
            pipeline.send(batch).await.unwrap();
        }
        let total = pipeline.finish().await.unwrap();

        assert_eq!(total, 10);
        let seen = store.seen.lock();
        let expected: Vec<String> = (0..5)
            .flat_map(|n| [format!("doc-{n}-a"), format!("doc-{n}-b")])
            .collect();
        assert_eq!(*seen, expected);
    }

    #[tokio::test]
    async fn storage_failure_surfaces_from_finish() {
        let store = Arc::new(RecordingStore::new(Some(1)));
        let pipeline = UpsertPipeline::spawn(store.clone(), 2);

        pipeline.send(vec![record("ok-1")]).await.unwrap();
        // The consumer may have already failed by the time later sends
        // happen; either the send or the finish reports the problem.
        let mut send_failed = false;
        for i in 0..4 {
            if pipeline.send(vec![record(&format!("late-{i}"))]).await.is_err() {
                send_failed = true;
                break;
            }
        }
        let finish = pipeline.finish().await;
        assert!(send_failed || finish.is_err());
        if let Err(err) = finish {
            assert!(matches!(err, Error::VectorStore(_)));
        }
        assert_eq!(store.seen.lock().len(), 1);
    }

    #[tokio::test]
    async fn finish_waits_for_drain() {
        let store = Arc::new(RecordingStore::new(None));
        let pipeline = UpsertPipeline::spawn(store.clone(), 2);
        pipeline.send(vec![record("a"), record("b")]).await.unwrap();
        pipeline.send(vec![record("c")]).await.unwrap();

        let total = pipeline.finish().await.unwrap();
        // After finish returns, everything sent is durably in the store.
        assert_eq!(total, 3);
        assert_eq!(store.len().await.unwrap(), 3);
    }
}
