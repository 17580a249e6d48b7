//! Article-aware structural segmentation.
//!
//! Georgian legal texts mark articles with header lines like `მუხლი 12.`
//! or `მუხლი 12 ...`. Each header starts a new block that runs to the next
//! header or end of text, so every chunk can carry the article it belongs
//! to.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::StructuralBlock;

/// Section title used when a document has no article headers at all.
pub const FULL_TEXT_TITLE: &str = "FULL_TEXT";

// Anchored at line start so inline mentions of article numbers do not open
// a new block. The numeral must be followed by punctuation, horizontal
// whitespace, or the end of the line.
static ARTICLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(მუხლი[ \t]+(\d+)(?:\.|[ \t]|$)[^\n]*)").expect("valid article regex")
});

/// Split `text` into ordered, non-overlapping blocks that tile `[0, len)`.
///
/// Text before the first header becomes a leading block with an empty
/// article tag. A document with no headers yields a single block titled
/// [`FULL_TEXT_TITLE`]. Empty input yields no blocks.
pub fn segment(text: &str) -> Vec<StructuralBlock> {
    if text.is_empty() {
        return Vec::new();
    }

    let matches: Vec<_> = ARTICLE_HEADER.captures_iter(text).collect();
    if matches.is_empty() {
        return vec![StructuralBlock {
            start: 0,
            end: text.len(),
            section_title: FULL_TEXT_TITLE.to_string(),
            article: String::new(),
        }];
    }

    let mut blocks = Vec::with_capacity(matches.len() + 1);

    let first_start = matches[0].get(0).expect("match 0").start();
    if first_start > 0 {
        blocks.push(StructuralBlock {
            start: 0,
            end: first_start,
            section_title: String::new(),
            article: String::new(),
        });
    }

    for (i, caps) in matches.iter().enumerate() {
        let start = caps.get(0).expect("match 0").start();
        let end = matches
            .get(i + 1)
            .map(|next| next.get(0).expect("match 0").start())
            .unwrap_or(text.len());
        blocks.push(StructuralBlock {
            start,
            end,
            section_title: caps.get(1).expect("title group").as_str().trim().to_string(),
            article: caps.get(2).expect("number group").as_str().to_string(),
        });
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(text: &str, blocks: &[StructuralBlock]) {
        let mut cursor = 0;
        for block in blocks {
            assert_eq!(block.start, cursor, "gap or overlap at {}", block.start);
            assert!(block.start < block.end);
            cursor = block.end;
        }
        assert_eq!(cursor, text.len(), "blocks must cover the whole text");
    }

    #[test]
    fn no_headers_yields_single_full_text_block() {
        let text = "ზოგადი ტექსტი ყოველგვარი სათაურის გარეშე.\nმეორე ხაზი.";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].section_title, FULL_TEXT_TITLE);
        assert_eq!(blocks[0].article, "");
        assert_tiles(text, &blocks);
    }

    #[test]
    fn empty_text_yields_no_blocks() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn headers_start_blocks_with_article_numbers() {
        let text = "მუხლი 1. ზოგადი დებულებები\nპირველი მუხლის ტექსტი.\nმუხლი 2. ტერმინები\nმეორე მუხლის ტექსტი.\n";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].article, "1");
        assert_eq!(blocks[0].section_title, "მუხლი 1. ზოგადი დებულებები");
        assert_eq!(blocks[1].article, "2");
        assert!(blocks[1].section_title.starts_with("მუხლი 2."));
        assert_tiles(text, &blocks);
    }

    #[test]
    fn preamble_before_first_header_becomes_leading_block() {
        let text = "კანონის პრეამბულა.\nმუხლი 1. საგანი\nტექსტი.\n";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].article, "");
        assert_eq!(blocks[0].start, 0);
        assert_eq!(blocks[1].article, "1");
        assert_tiles(text, &blocks);
    }

    #[test]
    fn inline_mentions_do_not_open_blocks() {
        let text = "მუხლი 1. საგანი\nიხილეთ მუხლი 5 დამატებით.\n";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].article, "1");
        assert_tiles(text, &blocks);
    }

    #[test]
    fn header_without_trailing_dot_matches() {
        let text = "მუხლი 7 გარდამავალი დებულებები\nტექსტი.\n";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].article, "7");
    }

    #[test]
    fn indented_header_block_starts_at_line_start() {
        let text = "მუხლი 1. ერთი\nტექსტი\n  მუხლი 2. ორი\nტექსტი\n";
        let blocks = segment(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].section_title, "მუხლი 2. ორი");
        assert_tiles(text, &blocks);
    }
}
