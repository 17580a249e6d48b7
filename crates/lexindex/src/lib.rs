//! lexindex: incremental indexing pipeline for legal documents.
//!
//! Ingests pre-extracted plain-text legal codes and maintains a searchable
//! vector index of overlapping passages tagged with their article numbers.
//! The pipeline is article-aware (Georgian `მუხლი N.` headers), detects
//! unchanged documents via content hashing, and streams chunks through an
//! order-preserving embed stage into a bounded upsert queue. The manifest
//! entry for a document is committed only after all of its vectors have
//! drained to storage, so a crash never leaves a document half-indexed but
//! marked as done.
//!
//! Embedding and vector storage are external collaborators behind the
//! [`providers`] traits; an HTTP embedder and an in-process store ship as
//! reference implementations.

pub mod chunking;
pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::IndexConfig;
pub use error::{Error, Result};
pub use manifest::{content_hash, ManifestEntry, ManifestStore};
pub use pipeline::{DocOutcome, IndexReport, Indexer};
pub use providers::{EmbeddingMode, EmbeddingProvider, ScoredMatch, VectorStoreProvider};
pub use retrieval::Retriever;
pub use types::{Chunk, ChunkMetadata, Document, StructuralBlock, UpsertRecord};
