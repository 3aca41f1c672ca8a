//! Persisted model artifact: a fitted vectorizer and classifier in one JSON document.
//!
//! ```json
//! {
//!   "vectorizer": {
//!     "vocabulary": {"adorei": 0, "pessimo": 1},
//!     "idf": [1.7, 2.1],
//!     "ngram_range": [1, 2],
//!     "sublinear_tf": true,
//!     "norm": "l2"
//!   },
//!   "model": {
//!     "classes": ["negative", "neutral", "positive"],
//!     "coef": [[-1.2, 2.3], [0.1, -0.4], [1.1, -1.9]],
//!     "intercept": [0.0, 0.2, -0.2],
//!     "multi_class": "multinomial"
//!   }
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ModelError};
use crate::model::{LinearClassifier, ModelProvider};
use crate::vectorizer::{TfIdfVectorizer, Vectorizer};

/// Fitted vectorizer and classifier loaded together at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Text to feature vector transformation.
    pub vectorizer: TfIdfVectorizer,
    /// Feature vector to label classifier.
    pub model: LinearClassifier,
}

impl ModelArtifact {
    /// Pairs a vectorizer with a classifier, checking they agree on the feature count.
    pub fn new(vectorizer: TfIdfVectorizer, model: LinearClassifier) -> Result<Self, ModelError> {
        let artifact = Self { vectorizer, model };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Reads and validates an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads and validates an artifact from any JSON source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_reader(reader)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Parses and validates an artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks both halves and that the vectorizer output fits the classifier input.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.vectorizer.validate()?;
        self.model.validate()?;

        let produced = self.vectorizer.n_features();
        let expected = self.model.n_features();
        if produced != expected {
            return Err(ModelError::Shape(format!(
                "vectorizer produces {} features but the model expects {}",
                produced, expected
            )));
        }

        Ok(())
    }

    /// Number of classes the model predicts.
    pub fn n_classes(&self) -> usize {
        self.model.classes().len()
    }
}
