//! Document, chunk, and upsert record types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source document read from the corpus directory.
///
/// Immutable once read for a run; `id` is the filename stem.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document identifier (filename stem)
    pub id: String,
    /// Path the document was read from
    pub path: PathBuf,
    /// Full extracted text
    pub raw_text: String,
}

impl Document {
    /// Build a document from a file path and its contents.
    ///
    /// The id is the filename stem; paths without a valid stem fall back
    /// to the lossy full filename.
    pub fn new(path: impl Into<PathBuf>, raw_text: String) -> Self {
        let path = path.into();
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { id, path, raw_text }
    }
}

/// A contiguous structural region of a document, anchored on the nearest
/// preceding article header.
///
/// `start..end` is a half-open byte range into the raw text. Blocks
/// produced by the segmenter are ascending, non-overlapping, and tile the
/// whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralBlock {
    /// Byte offset where the block starts (inclusive)
    pub start: usize,
    /// Byte offset where the block ends (exclusive)
    pub end: usize,
    /// Trimmed header line, or `FULL_TEXT` when no headers exist
    pub section_title: String,
    /// Article number as written in the header, empty when absent
    pub article: String,
}

/// One overlapping window of a document, ready for embedding.
///
/// `start..end` is the untrimmed window range; `content` is the trimmed
/// slice and is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Owning document id
    pub doc_id: String,
    /// Trimmed window text
    pub content: String,
    /// Window start, byte offset into the raw text
    pub start: usize,
    /// Window end, byte offset into the raw text
    pub end: usize,
    /// Section title inherited from the enclosing block
    pub section_title: String,
    /// Article number inherited from the enclosing block
    pub article: String,
}

impl Chunk {
    /// Deterministic record id: re-upserting an unchanged chunk overwrites
    /// rather than duplicates.
    pub fn record_id(&self) -> String {
        format!("{}-{}-{}", self.doc_id, self.start, self.end)
    }
}

/// Metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub doc_id: String,
    pub source_path: String,
    pub section_title: String,
    pub article: String,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A vector plus metadata, addressed by a deterministic id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertRecord {
    /// `{doc_id}-{start}-{end}`
    pub id: String,
    /// Embedding vector, fixed dimension per backend
    pub values: Vec<f32>,
    /// Structural and provenance metadata
    pub metadata: ChunkMetadata,
}

impl UpsertRecord {
    /// Assemble a record from a chunk and its embedding.
    pub fn from_chunk(chunk: &Chunk, source_path: &std::path::Path, values: Vec<f32>) -> Self {
        Self {
            id: chunk.record_id(),
            values,
            metadata: ChunkMetadata {
                doc_id: chunk.doc_id.clone(),
                source_path: source_path.to_string_lossy().into_owned(),
                section_title: chunk.section_title.clone(),
                article: chunk.article.clone(),
                start: chunk.start,
                end: chunk.end,
                text: chunk.content.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_is_filename_stem() {
        let doc = Document::new("data/processed/civil_code.txt", String::new());
        assert_eq!(doc.id, "civil_code");
    }

    #[test]
    fn record_id_is_deterministic() {
        let chunk = Chunk {
            doc_id: "tax_code".into(),
            content: "text".into(),
            start: 120,
            end: 540,
            section_title: String::new(),
            article: "3".into(),
        };
        assert_eq!(chunk.record_id(), "tax_code-120-540");
    }
}
