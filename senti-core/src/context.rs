//! Resident model state, built once at startup and injected into the service.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::artifact::ModelArtifact;
use crate::model::ModelProvider;
use crate::vectorizer::Vectorizer;

/// Immutable model state shared by every request.
///
/// A failed load is represented as [`ModelContext::Unavailable`] instead of an
/// error so the process keeps serving and answers every prediction with
/// "service unavailable".
#[derive(Clone)]
pub enum ModelContext {
    /// Vectorizer and model are ready.
    Loaded {
        /// Text to feature vector transformation.
        vectorizer: Arc<dyn Vectorizer>,
        /// Feature vector to label classifier.
        model: Arc<dyn ModelProvider>,
    },
    /// Loading failed; `reason` is kept for diagnostics only.
    Unavailable {
        /// Why loading failed.
        reason: String,
    },
}

impl ModelContext {
    /// Wraps an already constructed vectorizer and model.
    pub fn new<V, M>(vectorizer: V, model: M) -> Self
    where
        V: Vectorizer + 'static,
        M: ModelProvider + 'static,
    {
        Self::Loaded {
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
        }
    }

    /// Builds a context from a validated artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self::new(artifact.vectorizer, artifact.model)
    }

    /// Marks the model as unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Loads the artifact at `path`, degrading to `Unavailable` on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match ModelArtifact::load(path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    classes = artifact.n_classes(),
                    vocabulary = artifact.vectorizer.vocabulary_len(),
                    "model loaded"
                );
                Self::from_artifact(artifact)
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to load model artifact");
                Self::unavailable(err.to_string())
            }
        }
    }

    /// Returns `true` if predictions can be served.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { vectorizer, model } => f
                .debug_struct("Loaded")
                .field("n_features", &vectorizer.n_features())
                .field("classes", &model.classes())
                .finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::fixtures::SENTIMENT_JSON;

    #[test]
    fn from_artifact_is_loaded() {
        let artifact = ModelArtifact::from_json(SENTIMENT_JSON).unwrap();
        assert!(ModelContext::from_artifact(artifact).is_loaded());
    }

    #[test]
    fn missing_file_degrades() {
        let context = ModelContext::load("/nonexistent/senti/model.json");
        assert!(!context.is_loaded());
        match context {
            ModelContext::Unavailable { reason } => assert!(reason.contains("read")),
            ModelContext::Loaded { .. } => panic!("expected unavailable"),
        }
    }

    #[test]
    fn invalid_file_degrades() {
        let path = std::env::temp_dir().join(format!("senti-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{\"vectorizer\": 1}").unwrap();

        let context = ModelContext::load(&path);
        assert!(!context.is_loaded());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn debug_shows_state() {
        let context = ModelContext::unavailable("boom");
        assert_eq!(format!("{:?}", context), "Unavailable { reason: \"boom\" }");
    }
}
