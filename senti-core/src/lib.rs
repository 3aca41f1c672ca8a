//! Serving core for a three-class sentiment classifier.
//!
//! Raw request text flows through:
//! - [`analyzer`]: canonicalization, tokenization and n-gram extraction
//! - [`vectorizer`]: TF-IDF feature vectors
//! - [`model`]: linear classifier producing a label and a distribution
//! - [`service`]: validation, label mapping and response shaping
//!
//! The vectorizer and model are loaded once into a [`ModelContext`] and
//! injected into the [`PredictionService`].

pub mod analyzer;
pub mod artifact;
pub mod context;
pub mod error;
pub mod model;
pub mod service;
pub mod vectorizer;

pub use artifact::ModelArtifact;
pub use context::ModelContext;
pub use error::{ArtifactError, ModelError};
pub use model::{LinearClassifier, ModelProvider, MultiClass};
pub use service::{PredictionService, Reply, ServiceStats};
pub use vectorizer::{Norm, SparseVector, TfIdfVectorizer, Vectorizer};
