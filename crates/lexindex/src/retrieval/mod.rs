//! Query-side retrieval over the indexed corpus.

pub mod search;

pub use search::Retriever;
