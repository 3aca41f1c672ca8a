//! Error types for vectorization, inference and artifact loading.

use thiserror::Error;

/// Failures raised by vectorizers and model providers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Weights, vocabulary or inputs disagree on their dimensions.
    #[error("Shape mismatch: {0}")]
    Shape(String),

    /// A sparse column points past the end of a dense row.
    #[error("Feature index {index} out of range for {n_features} features")]
    FeatureOutOfRange {
        /// Offending column.
        index: u32,
        /// Width of the row it was looked up in.
        n_features: usize,
    },

    /// `predict_proba` returned no classes.
    #[error("Model produced an empty probability distribution")]
    EmptyDistribution,

    /// `predict_proba` returned NaN or a value outside `[0, 1]`.
    #[error("Model produced an invalid probability: {0}")]
    InvalidProbability(f32),

    /// The provider panicked; carries the panic message.
    #[error("Inference panicked: {0}")]
    Panicked(String),
}

/// Failures raised while loading a persisted model artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file could not be opened or read.
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact is not valid JSON or does not match the expected layout.
    #[error("Failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// The artifact parsed but its vectorizer and model are inconsistent.
    #[error("Invalid model artifact: {0}")]
    Invalid(#[from] ModelError),
}

/// Result alias for vectorizer and model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
