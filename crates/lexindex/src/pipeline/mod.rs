//! Concurrent embed → upsert pipeline and its orchestrator.

pub mod executor;
pub mod indexer;
pub mod upsert;

pub use executor::EmbeddingExecutor;
pub use indexer::{DocOutcome, DocResult, IndexReport, Indexer};
pub use upsert::UpsertPipeline;
