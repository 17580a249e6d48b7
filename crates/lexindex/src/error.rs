//! Error types for the indexing pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Manifest persistence error
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Upsert pipeline error
    #[error("Upsert pipeline error: {0}")]
    Pipeline(String),

    /// A single document failed to index
    #[error("Indexing '{doc_id}' failed: {source}")]
    Document {
        doc_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Indexing was cancelled between batches
    #[error("Indexing cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create a manifest error
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest(message.into())
    }

    /// Create an upsert pipeline error
    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline(message.into())
    }

    /// Wrap an error with the document it belongs to
    pub fn for_document(doc_id: impl Into<String>, source: Error) -> Self {
        Self::Document {
            doc_id: doc_id.into(),
            source: Box::new(source),
        }
    }
}
