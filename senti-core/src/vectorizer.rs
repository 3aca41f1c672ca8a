//! Sparse feature vectors and the TF-IDF vectorizer that produces them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::ngram::{count_ngrams, extract_ngrams, NgramRange};
use crate::analyzer::tokenizer::{Tokenizer, DEFAULT_MIN_TOKEN_CHARS};
use crate::error::{ModelError, Result};

/// Vector normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Sum of absolute values equals one.
    L1,
    /// Euclidean length equals one.
    L2,
}

/// Sparse feature vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vector from `(column, value)` pairs in any order.
    /// Duplicate columns are summed.
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(col, _)| col);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());

        for (col, value) in pairs {
            if indices.last() == Some(&col) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(col);
                values.push(value);
            }
        }

        Self { indices, values }
    }

    /// Column indices, strictly increasing.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Values aligned with [`indices`](Self::indices).
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no entry is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Scales the vector to unit length under `norm`. Zero vectors are left as-is.
    pub fn normalize(&mut self, norm: Norm) {
        let length = match norm {
            Norm::L1 => self.values.iter().map(|v| v.abs()).sum::<f32>(),
            Norm::L2 => self.values.iter().map(|v| v * v).sum::<f32>().sqrt(),
        };

        if length > 0.0 {
            for v in &mut self.values {
                *v /= length;
            }
        }
    }

    /// Dot product with a dense row.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::FeatureOutOfRange` if a column does not exist in `dense`.
    #[inline]
    pub fn dot(&self, dense: &[f32]) -> Result<f32> {
        let mut acc = 0.0f32;
        for (col, value) in self.iter() {
            let weight = dense
                .get(col as usize)
                .ok_or(ModelError::FeatureOutOfRange {
                    index: col,
                    n_features: dense.len(),
                })?;
            acc += value * weight;
        }
        Ok(acc)
    }
}

/// Turns canonical text into a feature vector.
///
/// Implementations are loaded once and shared across request handlers, so
/// `transform` must be callable concurrently through `&self`.
pub trait Vectorizer: Send + Sync {
    /// Transforms a single text into a feature vector.
    fn transform(&self, text: &str) -> Result<SparseVector>;

    /// Number of columns of the produced vectors.
    fn n_features(&self) -> usize;
}

fn default_min_token_chars() -> usize {
    DEFAULT_MIN_TOKEN_CHARS
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Fitted word-level TF-IDF vectorizer.
///
/// Term frequencies are counted over word n-grams, optionally dampened with
/// `1 + ln(tf)`, multiplied by the fitted inverse document frequencies and
/// finally normalized. Terms outside the vocabulary are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    vocabulary: FxHashMap<String, u32>,
    idf: Vec<f32>,
    #[serde(default)]
    ngram_range: NgramRange,
    #[serde(default = "default_min_token_chars")]
    min_token_chars: usize,
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

impl TfIdfVectorizer {
    /// Creates a vectorizer from a vocabulary and its idf weights.
    ///
    /// Uses unigrams, a two-character token minimum, raw term counts and l2
    /// normalization; adjust with the `with_*` methods.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Shape` if a vocabulary column has no idf weight.
    pub fn new<I>(vocabulary: I, idf: Vec<f32>) -> Result<Self>
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let vectorizer = Self {
            vocabulary: vocabulary.into_iter().collect(),
            idf,
            ngram_range: NgramRange::default(),
            min_token_chars: DEFAULT_MIN_TOKEN_CHARS,
            sublinear_tf: false,
            norm: default_norm(),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Sets the n-gram range.
    pub fn with_ngram_range(mut self, range: NgramRange) -> Self {
        self.ngram_range = range;
        self
    }

    /// Sets the minimum token length.
    pub fn with_min_token_chars(mut self, min_token_chars: usize) -> Self {
        self.min_token_chars = min_token_chars;
        self
    }

    /// Enables `1 + ln(tf)` term frequency dampening.
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    /// Sets the output normalization; `None` keeps raw TF-IDF weights.
    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    /// Number of vocabulary terms.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Checks that every vocabulary column has a finite idf weight and the
    /// n-gram range is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.ngram_range.is_valid() {
            return Err(ModelError::Shape(format!(
                "invalid ngram range ({}, {})",
                self.ngram_range.min_n, self.ngram_range.max_n
            )));
        }

        if let Some(weight) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(ModelError::Shape(format!("non-finite idf weight {}", weight)));
        }

        if let Some((term, &col)) = self
            .vocabulary
            .iter()
            .find(|(_, &col)| col as usize >= self.idf.len())
        {
            return Err(ModelError::Shape(format!(
                "term {:?} maps to column {} but only {} idf weights exist",
                term,
                col,
                self.idf.len()
            )));
        }

        Ok(())
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn transform(&self, text: &str) -> Result<SparseVector> {
        let tokens = Tokenizer::new(self.min_token_chars).tokens(text);

        let mut counts: FxHashMap<u32, f32> = FxHashMap::with_capacity_and_hasher(
            count_ngrams(tokens.len(), self.ngram_range),
            Default::default(),
        );
        let mut scratch = String::new();
        extract_ngrams(&tokens, self.ngram_range, &mut scratch, |term| {
            if let Some(&col) = self.vocabulary.get(term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        });

        let mut pairs = Vec::with_capacity(counts.len());
        for (col, tf) in counts {
            let idf = self
                .idf
                .get(col as usize)
                .ok_or(ModelError::FeatureOutOfRange {
                    index: col,
                    n_features: self.idf.len(),
                })?;
            let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
            pairs.push((col, tf * idf));
        }

        let mut vector = SparseVector::from_pairs(pairs);
        if let Some(norm) = self.norm {
            vector.normalize(norm);
        }
        Ok(vector)
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.idf.len()
    }
}
