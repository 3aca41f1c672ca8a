//! Word n-gram extraction.
//!
//! Builds the terms the vectorizer looks up in its vocabulary: contiguous runs
//! of `n` tokens joined by a single space, for every `n` in the configured range.

use serde::{Deserialize, Serialize};

/// Inclusive range of n-gram sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct NgramRange {
    /// Smallest n-gram size.
    pub min_n: usize,
    /// Largest n-gram size.
    pub max_n: usize,
}

impl Default for NgramRange {
    fn default() -> Self {
        Self { min_n: 1, max_n: 1 }
    }
}

impl From<(usize, usize)> for NgramRange {
    fn from((min_n, max_n): (usize, usize)) -> Self {
        Self { min_n, max_n }
    }
}

impl From<NgramRange> for (usize, usize) {
    fn from(range: NgramRange) -> Self {
        (range.min_n, range.max_n)
    }
}

impl NgramRange {
    /// Creates a new range.
    pub const fn new(min_n: usize, max_n: usize) -> Self {
        Self { min_n, max_n }
    }

    /// A range is valid when `1 <= min_n <= max_n`.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.min_n >= 1 && self.min_n <= self.max_n
    }
}

/// Extracts word n-grams from `tokens`.
///
/// Unigrams are passed through without copying; longer n-grams are joined
/// into `scratch`, which is reused between calls. N-grams are emitted by
/// increasing size, then by position.
///
/// # Example
///
/// ```
/// use senti_core::analyzer::ngram::{extract_ngrams, NgramRange};
///
/// let mut grams = Vec::new();
/// let mut scratch = String::new();
/// extract_ngrams(&["muito", "bom"], NgramRange::new(1, 2), &mut scratch, |g| {
///     grams.push(g.to_string())
/// });
///
/// assert_eq!(grams, ["muito", "bom", "muito bom"]);
/// ```
pub fn extract_ngrams<F>(tokens: &[&str], range: NgramRange, scratch: &mut String, mut callback: F)
where
    F: FnMut(&str),
{
    if !range.is_valid() {
        return;
    }

    let max_n = range.max_n.min(tokens.len());
    for n in range.min_n..=max_n {
        if n == 1 {
            for token in tokens {
                callback(*token);
            }
            continue;
        }

        for window in tokens.windows(n) {
            scratch.clear();
            for (i, token) in window.iter().enumerate() {
                if i > 0 {
                    scratch.push(' ');
                }
                scratch.push_str(token);
            }
            callback(scratch.as_str());
        }
    }
}

/// Counts the n-grams [`extract_ngrams`] would emit for `token_count` tokens.
pub fn count_ngrams(token_count: usize, range: NgramRange) -> usize {
    if !range.is_valid() {
        return 0;
    }

    (range.min_n..=range.max_n)
        .take_while(|&n| n <= token_count)
        .map(|n| token_count - n + 1)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(tokens: &[&str], range: NgramRange) -> Vec<String> {
        let mut out = Vec::new();
        let mut scratch = String::new();
        extract_ngrams(tokens, range, &mut scratch, |g| out.push(g.to_string()));
        out
    }

    #[test]
    fn unigrams_only_by_default() {
        assert_eq!(
            grams(&["nao", "gostei"], NgramRange::default()),
            ["nao", "gostei"]
        );
    }

    #[test]
    fn unigrams_and_bigrams() {
        assert_eq!(
            grams(&["nao", "gostei", "nada"], NgramRange::new(1, 2)),
            ["nao", "gostei", "nada", "nao gostei", "gostei nada"]
        );
    }

    #[test]
    fn bigrams_only() {
        assert_eq!(
            grams(&["a1", "b2", "c3"], NgramRange::new(2, 2)),
            ["a1 b2", "b2 c3"]
        );
    }

    #[test]
    fn range_larger_than_input() {
        assert_eq!(grams(&["solo"], NgramRange::new(1, 3)), ["solo"]);
        assert!(grams(&["solo"], NgramRange::new(2, 3)).is_empty());
    }

    #[test]
    fn empty_tokens() {
        assert!(grams(&[], NgramRange::new(1, 2)).is_empty());
    }

    #[test]
    fn invalid_range_emits_nothing() {
        assert!(grams(&["a1", "b2"], NgramRange::new(0, 1)).is_empty());
        assert!(grams(&["a1", "b2"], NgramRange::new(2, 1)).is_empty());
        assert_eq!(count_ngrams(2, NgramRange::new(2, 1)), 0);
    }

    #[test]
    fn count_matches_extraction() {
        let tokens = ["um", "dois", "tres", "quatro"];
        for range in [
            NgramRange::new(1, 1),
            NgramRange::new(1, 2),
            NgramRange::new(2, 3),
            NgramRange::new(1, 6),
        ] {
            assert_eq!(count_ngrams(tokens.len(), range), grams(&tokens, range).len());
        }
    }

    #[test]
    fn range_from_tuple() {
        assert_eq!(NgramRange::from((1, 2)), NgramRange::new(1, 2));
    }
}
