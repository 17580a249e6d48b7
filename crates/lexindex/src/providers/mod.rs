//! Provider traits for the external embedding and vector-storage backends,
//! plus the bundled implementations.

pub mod embedding;
pub mod memory;
pub mod ollama;
pub mod vector_store;

pub use embedding::{EmbeddingMode, EmbeddingProvider};
pub use memory::MemoryVectorStore;
pub use ollama::OllamaEmbedder;
pub use vector_store::{ScoredMatch, VectorStoreProvider};
