//! Article-aware segmentation and token-budgeted windowing.

pub mod segmenter;
pub mod tokens;
pub mod windower;

pub use segmenter::{segment, FULL_TEXT_TITLE};
pub use tokens::{CharsPerToken, TokenEstimator, UnicodeWordEstimator};
pub use windower::{windows, Window, WindowIter};

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Document};

/// Lazily yield the overlapping chunks of a document, in document order:
/// sequential block, sequential window.
///
/// Chunks are generated on demand so a large corpus never holds all of a
/// document's chunks in memory at once.
pub fn iter_chunks<'a>(
    doc: &'a Document,
    config: &ChunkingConfig,
    estimator: &'a dyn TokenEstimator,
) -> impl Iterator<Item = Chunk> + 'a {
    let target = config.target_tokens;
    let overlap = config.overlap_tokens;

    segment(&doc.raw_text).into_iter().flat_map(move |block| {
        let text = &doc.raw_text[block.start..block.end];
        let base = block.start;
        windows(text, target, overlap, estimator).map(move |w| Chunk {
            doc_id: doc.id.clone(),
            content: w.content.to_string(),
            start: base + w.start,
            end: base + w.end,
            section_title: block.section_title.clone(),
            article: block.article.clone(),
        })
    })
}
