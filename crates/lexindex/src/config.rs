//! Configuration for the indexing pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Corpus enumeration and manifest location
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Batching, queueing, and failure policy
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl IndexConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| Error::config(e.to_string()))
    }
}

/// Corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory of pre-extracted plain-text documents
    pub data_dir: PathBuf,
    /// File extension to index
    pub extension: String,
    /// Path of the persisted index manifest
    pub manifest_path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/processed"),
            extension: "txt".to_string(),
            manifest_path: PathBuf::from("data/index_manifest.json"),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub target_tokens: usize,
    /// Overlap between consecutive chunks in tokens
    pub overlap_tokens: usize,
    /// Fixed chars-per-token ratio for the default estimator
    pub chars_per_token: f64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_tokens: 300,
            overlap_tokens: 40,
            chars_per_token: 4.0,
        }
    }
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Prepend E5-style `passage:`/`query:` prefixes per mode
    pub mode_prefixes: bool,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for failed requests
    pub max_retries: u32,
    /// Parallel embedding requests per batch (1 = backend-native batching)
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            mode_prefixes: false,
            timeout_secs: 120,
            max_retries: 2,
            concurrency: 4,
        }
    }
}

/// Batching and failure policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chunks per embedding batch
    pub batch_size: usize,
    /// Bounded upsert queue depth, in batches
    pub queue_depth: usize,
    /// Optional per-document chunk cap; the final batch is truncated to it
    pub max_chunks_per_doc: Option<usize>,
    /// Abort the whole run on the first failed document
    pub fail_fast: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            queue_depth: 2,
            max_chunks_per_doc: None,
            fail_fast: false,
        }
    }
}
