//! Token estimation for converting token budgets into byte budgets.
//!
//! Exact sub-word tokenizer parity is not a goal; an estimator only has to
//! be deterministic and applied consistently within one pipeline run.

use unicode_segmentation::UnicodeSegmentation;

/// Deterministic text-length estimator measured in tokens.
pub trait TokenEstimator: Send + Sync {
    /// Estimated token count, always at least 1 for non-empty text.
    fn count_tokens(&self, text: &str) -> usize;
}

/// Fixed characters-per-token heuristic (default).
#[derive(Debug, Clone)]
pub struct CharsPerToken {
    chars_per_token: f64,
}

impl CharsPerToken {
    pub fn new(chars_per_token: f64) -> Self {
        assert!(chars_per_token > 0.0, "chars_per_token must be positive");
        Self { chars_per_token }
    }
}

impl Default for CharsPerToken {
    fn default() -> Self {
        Self::new(4.0)
    }
}

impl TokenEstimator for CharsPerToken {
    fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let chars = text.chars().count() as f64;
        (chars / self.chars_per_token).ceil().max(1.0) as usize
    }
}

/// Unicode word-bound estimator: counts words and scales by a fixed
/// tokens-per-word factor, closer to sub-word tokenizers on prose.
#[derive(Debug, Clone)]
pub struct UnicodeWordEstimator {
    tokens_per_word: f64,
}

impl UnicodeWordEstimator {
    pub fn new(tokens_per_word: f64) -> Self {
        assert!(tokens_per_word > 0.0, "tokens_per_word must be positive");
        Self { tokens_per_word }
    }
}

impl Default for UnicodeWordEstimator {
    fn default() -> Self {
        Self::new(1.3)
    }
}

impl TokenEstimator for UnicodeWordEstimator {
    fn count_tokens(&self, text: &str) -> usize {
        let words = text.unicode_words().count();
        if words == 0 {
            return if text.trim().is_empty() { 0 } else { 1 };
        }
        (words as f64 * self.tokens_per_word).ceil().max(1.0) as usize
    }
}
