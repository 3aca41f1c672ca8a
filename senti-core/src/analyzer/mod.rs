//! Text analysis pipeline.
//!
//! This module provides the request-time text processing components:
//! - **Normalizer**: Canonicalizes raw text (lowercase, ASCII, no punctuation)
//! - **Tokenizer**: Splits canonical text into word tokens
//! - **Ngram**: Joins tokens into the terms looked up by the vectorizer

pub mod ngram;
pub mod normalizer;
pub mod tokenizer;

pub use ngram::NgramRange;
pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
