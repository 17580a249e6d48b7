//! Indexing orchestrator.
//!
//! Drives the full per-document flow: enumerate the corpus, hash and
//! change-detect against the manifest, stream chunks through batching,
//! embedding, and the bounded upsert queue, and commit the manifest only
//! after the document's batches have fully drained. A crash before commit
//! leaves the manifest stale, so the next run re-indexes the document;
//! deterministic record ids make that repeat safe.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;
use walkdir::WalkDir;

use crate::chunking::{self, CharsPerToken, TokenEstimator};
use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::manifest::{content_hash, ManifestStore};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{Chunk, Document, UpsertRecord};

use super::executor::EmbeddingExecutor;
use super::upsert::UpsertPipeline;

/// Final state of one document within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocOutcome {
    /// Content hash matched the manifest; nothing was embedded or upserted
    Skipped,
    /// All batches embedded, upserted, and the manifest committed
    Indexed { chunks: usize },
    /// Embedding or upsert failed; the manifest was left untouched
    Failed { error: String },
}

/// Per-document result row in the run report.
#[derive(Debug, Clone)]
pub struct DocResult {
    pub doc_id: String,
    pub outcome: DocOutcome,
}

/// Summary of one orchestrator run.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub run_id: Uuid,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_chunks: usize,
    pub documents: Vec<DocResult>,
}

impl IndexReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            indexed: 0,
            skipped: 0,
            failed: 0,
            total_chunks: 0,
            documents: Vec::new(),
        }
    }

    fn push(&mut self, doc_id: String, outcome: DocOutcome) {
        match &outcome {
            DocOutcome::Skipped => self.skipped += 1,
            DocOutcome::Indexed { chunks } => {
                self.indexed += 1;
                self.total_chunks += chunks;
            }
            DocOutcome::Failed { .. } => self.failed += 1,
        }
        self.documents.push(DocResult { doc_id, outcome });
    }
}

/// The indexing orchestrator.
pub struct Indexer {
    config: IndexConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    manifest: ManifestStore,
    estimator: Box<dyn TokenEstimator>,
    cancel: Arc<AtomicBool>,
}

impl Indexer {
    /// Build an orchestrator, loading the manifest from the configured
    /// path. Uses the fixed chars-per-token estimator from the config.
    pub fn new(
        config: IndexConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        let manifest = ManifestStore::load(&config.corpus.manifest_path);
        let estimator = Box::new(CharsPerToken::new(config.chunking.chars_per_token));
        Self {
            config,
            embedder,
            store,
            manifest,
            estimator,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the token estimator. The same estimator is applied to every
    /// document of the run, keeping budgets internally consistent.
    pub fn with_estimator(mut self, estimator: Box<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Flag checked between batches; setting it aborts the in-flight
    /// document without committing its manifest entry.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Index the configured corpus directory.
    ///
    /// Unreadable and empty documents are skipped with a warning. A failed
    /// document either fails the run (`pipeline.fail_fast`) or is recorded
    /// in the report while the run continues.
    pub async fn run(&mut self) -> Result<IndexReport> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let files = self.enumerate_corpus();
        tracing::info!(
            %run_id,
            files = files.len(),
            dir = %self.config.corpus.data_dir.display(),
            "starting indexing run"
        );

        let mut report = IndexReport::new(run_id);

        for path in files {
            let raw = match std::fs::read(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "unreadable file, skipping");
                    continue;
                }
            };
            let hash = content_hash(&raw);
            let text = match String::from_utf8(raw) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "not valid UTF-8, skipping");
                    continue;
                }
            };
            if text.trim().is_empty() {
                tracing::warn!(path = %path.display(), "empty document, skipping");
                continue;
            }

            let doc = Document::new(path, text);

            if self.manifest.is_unchanged(&doc.id, &hash) {
                tracing::info!(doc_id = %doc.id, "unchanged, skipping");
                report.push(doc.id, DocOutcome::Skipped);
                continue;
            }

            match self.index_document(&doc, &hash).await {
                Ok(chunks) => {
                    tracing::info!(doc_id = %doc.id, chunks, "document indexed");
                    report.push(doc.id, DocOutcome::Indexed { chunks });
                }
                Err(e) => {
                    tracing::error!(doc_id = %doc.id, error = %e, "document failed");
                    if self.config.pipeline.fail_fast {
                        return Err(Error::for_document(doc.id, e));
                    }
                    report.push(
                        doc.id,
                        DocOutcome::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }

        tracing::info!(
            %run_id,
            indexed = report.indexed,
            skipped = report.skipped,
            failed = report.failed,
            chunks = report.total_chunks,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "indexing run complete"
        );
        Ok(report)
    }

    /// Index one changed document end to end.
    ///
    /// The manifest commit happens strictly after the upsert pipeline has
    /// drained; on any error the entry is left untouched so the document
    /// stays eligible for a full retry.
    async fn index_document(&mut self, doc: &Document, hash: &str) -> Result<usize> {
        let executor =
            EmbeddingExecutor::new(Arc::clone(&self.embedder), self.config.embedding.concurrency);
        let pipeline = UpsertPipeline::spawn(
            Arc::clone(&self.store),
            self.config.pipeline.queue_depth,
        );

        match self.stream_batches(doc, &executor, &pipeline).await {
            Ok(chunks) => {
                let upserted = pipeline.finish().await?;
                if upserted != chunks {
                    return Err(Error::pipeline(format!(
                        "drained {upserted} records but produced {chunks} chunks"
                    )));
                }
                self.manifest.commit(&doc.id, hash)?;
                Ok(chunks)
            }
            Err(e) => {
                // A send failure is only the symptom of the consumer dying;
                // its own error names the actual storage cause.
                match pipeline.finish().await {
                    Err(consumer_err) => Err(consumer_err),
                    Ok(_) => Err(e),
                }
            }
        }
    }

    async fn stream_batches(
        &self,
        doc: &Document,
        executor: &EmbeddingExecutor,
        pipeline: &UpsertPipeline,
    ) -> Result<usize> {
        let batch_size = self.config.pipeline.batch_size.max(1);
        let cap = self.config.pipeline.max_chunks_per_doc;

        let mut chunks =
            chunking::iter_chunks(doc, &self.config.chunking, self.estimator.as_ref());
        let mut produced = 0usize;
        let mut batch_no = 0usize;

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            if cap.is_some_and(|cap| produced >= cap) {
                break;
            }

            let mut batch: Vec<Chunk> = Vec::with_capacity(batch_size);
            while batch.len() < batch_size {
                match chunks.next() {
                    Some(chunk) => batch.push(chunk),
                    None => break,
                }
            }
            if batch.is_empty() {
                break;
            }
            if let Some(cap) = cap {
                if produced + batch.len() > cap {
                    batch.truncate(cap - produced);
                }
            }

            batch_no += 1;
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            tracing::debug!(doc_id = %doc.id, batch_no, size = batch.len(), "embedding batch");
            let vectors = executor.embed_batch(&texts).await?;

            let records: Vec<UpsertRecord> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, values)| UpsertRecord::from_chunk(chunk, &doc.path, values))
                .collect();
            pipeline.send(records).await?;
            produced += batch.len();
        }

        Ok(produced)
    }

    fn enumerate_corpus(&self) -> Vec<PathBuf> {
        let extension = self.config.corpus.extension.as_str();
        let mut files: Vec<PathBuf> = WalkDir::new(&self.config.corpus.data_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(extension))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }
}
