//! Token-budgeted sliding windows over a structural block.
//!
//! Budgets are given in tokens and converted to byte budgets through a
//! per-block ratio, so the window math stays cheap while tracking the
//! configured token sizes. Every computed offset is clamped to a UTF-8
//! character boundary; Georgian script is three bytes per scalar and a
//! mid-character slice would panic.

use crate::chunking::tokens::TokenEstimator;

/// Preferred cut points, searched backward within the candidate window in
/// priority order: paragraph break, line break, sentence end.
const BOUNDARIES: [&str; 5] = ["\n\n", "\n", ". ", "? ", "! "];

/// One emitted window. `start..end` is the untrimmed local byte range;
/// `content` is the trimmed slice and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<'a> {
    pub start: usize,
    pub end: usize,
    pub content: &'a str,
}

/// Lazy iterator of overlapping windows over one block.
///
/// Stateless per construction, so calling [`windows`] twice with the same
/// arguments replays the identical sequence.
pub struct WindowIter<'a> {
    block: &'a str,
    cursor: usize,
    target_bytes: usize,
    overlap_bytes: usize,
    done: bool,
}

/// Slide a token-budgeted window across `block`.
///
/// The block's own chars-per-token ratio converts the budgets into byte
/// budgets, recomputed per block as headers and dense prose differ.
pub fn windows<'a>(
    block: &'a str,
    target_tokens: usize,
    overlap_tokens: usize,
    estimator: &dyn TokenEstimator,
) -> WindowIter<'a> {
    let tokens = estimator.count_tokens(block).max(1);
    let ratio = block.len() as f64 / tokens as f64;
    let target_bytes = ((target_tokens as f64 * ratio) as usize).max(1);
    let overlap_bytes = (overlap_tokens as f64 * ratio) as usize;
    WindowIter {
        block,
        cursor: 0,
        target_bytes,
        overlap_bytes,
        done: block.is_empty(),
    }
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Window<'a>> {
        if self.done || self.cursor >= self.block.len() {
            return None;
        }

        let len = self.block.len();
        let candidate = self.cursor.saturating_add(self.target_bytes).min(len);
        let mut end = floor_boundary(self.block, candidate);
        if end <= self.cursor {
            end = ceil_boundary(self.block, self.cursor + 1);
        }

        // Snap backward to the highest-priority boundary inside the window.
        for sep in BOUNDARIES {
            if let Some(idx) = self.block[self.cursor..end].rfind(sep) {
                let snapped = self.cursor + idx + sep.len();
                if snapped > self.cursor {
                    end = snapped;
                }
                break;
            }
        }

        let content = self.block[self.cursor..end].trim();
        if content.is_empty() {
            // Whitespace-only remainder; stop instead of spinning on it.
            self.done = true;
            return None;
        }

        let window = Window {
            start: self.cursor,
            end,
            content,
        };

        if end >= len {
            self.done = true;
        } else {
            // Retreat by the overlap, but always strictly advance so even
            // overlap >= target cannot stall the iterator.
            let mut next = floor_boundary(self.block, end.saturating_sub(self.overlap_bytes));
            if next <= self.cursor {
                next = ceil_boundary(self.block, self.cursor + 1);
            }
            self.cursor = next;
        }

        Some(window)
    }
}

fn floor_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::tokens::CharsPerToken;

    fn collect(block: &str, target: usize, overlap: usize) -> Vec<Window<'_>> {
        windows(block, target, overlap, &CharsPerToken::default()).collect()
    }

    #[test]
    fn short_block_is_one_window() {
        let text = "მოკლე ტექსტი.";
        let wins = collect(text, 300, 40);
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].start, 0);
        assert_eq!(wins[0].end, text.len());
        assert_eq!(wins[0].content, text);
    }

    #[test]
    fn windows_never_empty_and_ordered() {
        let sentence = "კანონის ტექსტი გრძელდება და გრძელდება. ";
        let text = sentence.repeat(40);
        let wins = collect(&text, 30, 5);
        assert!(wins.len() > 1);
        for w in &wins {
            assert!(w.start < w.end);
            assert!(!w.content.is_empty());
            assert_eq!(w.content, text[w.start..w.end].trim());
        }
    }

    #[test]
    fn consecutive_windows_overlap_and_advance() {
        let sentence = "ერთი წინადადება მეორის შემდეგ მოდის აქ. ";
        let text = sentence.repeat(60);
        let wins = collect(&text, 300, 40);
        assert!(wins.len() >= 2);
        for pair in wins.windows(2) {
            assert!(pair[1].start <= pair[0].end, "overlap must be >= 0");
            assert!(pair[1].start > pair[0].start, "cursor must advance");
        }
    }

    #[test]
    fn overlap_not_smaller_than_target_still_terminates() {
        let sentence = "პათოლოგიური კონფიგურაცია მაინც მთავრდება. ";
        let text = sentence.repeat(30);
        let wins = collect(&text, 20, 50);
        assert!(!wins.is_empty());
        for pair in wins.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
        assert_eq!(wins.last().unwrap().end, text.len());
    }

    #[test]
    fn whitespace_tail_terminates_early() {
        let text = format!("{}\n\n{}", "ტექსტი აქ მთავრდება.", "   \n   \n   ");
        let wins = collect(&text, 8, 2);
        assert!(!wins.is_empty());
        for w in &wins {
            assert!(!w.content.is_empty());
        }
    }

    #[test]
    fn zero_overlap_produces_disjoint_forward_windows() {
        let sentence = "ეს არის წინადადება ნომერი ორმოცდაათი. ";
        let text = sentence.repeat(50);
        let wins = collect(&text, 40, 0);
        for pair in wins.windows(2) {
            assert!(pair[1].start >= pair[0].end - 1);
        }
    }

    #[test]
    fn snaps_to_paragraph_break_before_sentence_break() {
        let text = format!("{}\n\n{}", "ა".repeat(100), "ბ".repeat(900));
        let wins = collect(&text, 100, 0);
        // First window should cut at the paragraph break, not mid-"ბ" run.
        assert_eq!(wins[0].content, "ა".repeat(100));
    }

    #[test]
    fn restartable_iteration_is_identical() {
        let sentence = "განმეორებადი შედეგი სავალდებულოა. ";
        let text = sentence.repeat(25);
        let first: Vec<_> = collect(&text, 50, 10);
        let second: Vec<_> = collect(&text, 50, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_block_yields_nothing() {
        assert!(collect("", 300, 40).is_empty());
    }
}
