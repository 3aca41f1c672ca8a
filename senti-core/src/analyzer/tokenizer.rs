//! Streaming word tokenizer.
//!
//! Splits canonical text into the word tokens the vectorizer counts. It is the
//! second stage of the request pipeline, after the normalizer.
//!
//! ## What It Does
//!
//! Given canonical input like `"nao gostei do app"`, it emits each word with
//! its position among the *kept* tokens:
//!
//! ```ignore
//! ("nao", 0)
//! ("gostei", 1)
//! ("do", 2)
//! ("app", 3)
//! ```
//!
//! A token is a maximal run of word characters (alphanumerics and `_`).
//! Tokens shorter than the configured minimum are skipped, which matches the
//! `\w\w+` pattern most bag-of-words vectorizers are fitted with.
//!
//! ## Zero Allocation
//!
//! Tokens are slices of the input; nothing is copied while scanning.

use smallvec::SmallVec;

/// Default minimum token length, in characters.
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 2;

/// Inline capacity of a per-text token buffer.
pub const INLINE_TOKENS: usize = 32;

/// Token buffer that stays on the stack for typical review-sized texts.
pub type TokenBuf<'n> = SmallVec<[&'n str; INLINE_TOKENS]>;

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Streaming tokenizer - splits text into word tokens.
///
/// ## Example
///
/// ```
/// use senti_core::analyzer::Tokenizer;
///
/// let tokenizer = Tokenizer::default();
/// let mut count = 0;
///
/// tokenizer.tokenize("muito bom o app", |_text, _pos| {
///     count += 1;
/// });
///
/// // "o" is shorter than the two-character minimum
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    min_token_chars: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_CHARS)
    }
}

impl Tokenizer {
    /// Creates a tokenizer that drops tokens shorter than `min_token_chars`.
    /// A minimum of zero behaves like one.
    #[inline]
    pub const fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    /// Minimum token length, in characters.
    #[inline]
    pub const fn min_token_chars(&self) -> usize {
        self.min_token_chars
    }

    /// Tokenizes `text` and emits `(token, position)`.
    ///
    /// Position is `u32` and counts emitted tokens only. After emitting a token
    /// at position `u32::MAX`, further emissions stop.
    #[inline]
    pub fn tokenize<'n, F>(&self, text: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let mut pos = 0u32;

        for token in text.split(|c: char| !is_word_char(c)) {
            if token.is_empty() || !self.long_enough(token) {
                continue;
            }

            emit(token, pos);

            pos = match pos.checked_add(1) {
                Some(next) => next,
                None => return,
            };
        }
    }

    /// Collects the tokens of `text` into a stack-first buffer.
    pub fn tokens<'n>(&self, text: &'n str) -> TokenBuf<'n> {
        let mut out = TokenBuf::new();
        self.tokenize(text, |token, _| out.push(token));
        out
    }

    #[inline(always)]
    fn long_enough(&self, token: &str) -> bool {
        // Byte length bounds the char count from above.
        self.min_token_chars <= 1
            || (token.len() >= self.min_token_chars
                && token.chars().count() >= self.min_token_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        Tokenizer::default().tokenize(text, |t, p| out.push((t.to_string(), p)));
        out
    }

    #[test]
    fn splits_on_single_spaces() {
        let tokens = collect("nao gostei do app");
        assert_eq!(
            tokens,
            vec![
                ("nao".into(), 0),
                ("gostei".into(), 1),
                ("do".into(), 2),
                ("app".into(), 3)
            ]
        );
    }

    #[test]
    fn whitespace_runs_do_not_produce_empty_tokens() {
        let tokens = Tokenizer::default().tokens("  muito \t\n bom  ");
        assert_eq!(tokens.as_slice(), &["muito", "bom"]);
    }

    #[test]
    fn short_tokens_skipped_and_positions_stay_dense() {
        let tokens = collect("o app e muito bom");
        assert_eq!(
            tokens,
            vec![("app".into(), 0), ("muito".into(), 1), ("bom".into(), 2)]
        );
    }

    #[test]
    fn single_char_tokens_kept_with_minimum_one() {
        let tokens = Tokenizer::new(1).tokens("o app e bom");
        assert_eq!(tokens.as_slice(), &["o", "app", "e", "bom"]);
    }

    #[test]
    fn minimum_zero_behaves_like_one() {
        let tokens = Tokenizer::new(0).tokens("a b");
        assert_eq!(tokens.as_slice(), &["a", "b"]);
    }

    #[test]
    fn punctuation_splits_raw_text() {
        let tokens = Tokenizer::default().tokens("bom,demais!ok");
        assert_eq!(tokens.as_slice(), &["bom", "demais", "ok"]);
    }

    #[test]
    fn underscore_and_digits_are_word_chars() {
        let tokens = Tokenizer::default().tokens("nota_10 99");
        assert_eq!(tokens.as_slice(), &["nota_10", "99"]);
    }

    #[test]
    fn minimum_counts_chars_not_bytes() {
        let tokens = Tokenizer::default().tokens("é ab");
        assert_eq!(tokens.as_slice(), &["ab"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(collect("").is_empty());
        assert!(collect("   ").is_empty());
    }

    #[test]
    fn tokens_are_slices_of_input() {
        let text = String::from("adorei o aplicativo");
        let tokens = Tokenizer::default().tokens(&text);
        let base = text.as_ptr() as usize;
        for token in tokens {
            let p = token.as_ptr() as usize;
            assert!(p >= base && p < base + text.len());
        }
    }
}
