//! Public API for serving predictions.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;

use senti_types::{round_confidence, DisplayLabel, PredictionResult, ServiceError};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::analyzer::normalizer::is_canonical;
use crate::analyzer::NormalizerConfig;
use crate::context::ModelContext;
use crate::error::ModelError;
use crate::model::{argmax, ModelProvider};
use crate::service::types::{PredictionService, Reply, TEXT_FIELD};
use crate::vectorizer::Vectorizer;

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn trim_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

impl PredictionService {
    /// Classifies the `text` field of a request body.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ServiceUnavailable` if the model is not loaded,
    /// whatever the body holds.
    /// Returns `ServiceError::BadRequest` if the body is absent or not an
    /// object, `text` is absent or not a string, or the trimmed text is
    /// shorter than `min_text_chars`.
    /// Returns `ServiceError::Internal` with the failure's message if
    /// vectorization or inference fails (including panics inside the model).
    pub fn predict(&self, body: Option<&Value>) -> Result<PredictionResult, ServiceError> {
        let c = &self.counters;
        c.requests.fetch_add(1, Ordering::Relaxed);

        let outcome = self.run(body);

        let counter = match &outcome {
            Ok(result) => {
                if !result.display_label.is_known() {
                    c.unrecognized.fetch_add(1, Ordering::Relaxed);
                }
                &c.succeeded
            }
            Err(ServiceError::ServiceUnavailable) => &c.unavailable,
            Err(ServiceError::BadRequest) => &c.rejected,
            Err(ServiceError::Internal(_)) => &c.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        outcome
    }

    /// Classifies a request body and shapes the HTTP reply.
    pub fn respond(&self, body: Option<&Value>) -> Reply {
        match self.predict(body) {
            Ok(result) => Reply {
                status: 200,
                body: json!({
                    "previsao": result.display_label.as_str(),
                    "probabilidade": result.confidence,
                    "texto_processado": result.canonical_text,
                }),
            },
            Err(err) => Reply {
                status: err.status(),
                body: json!({ "erro": err.message() }),
            },
        }
    }

    /// Extracts and checks the raw text of a request body.
    ///
    /// The length check runs on the raw text, trimmed of surrounding
    /// whitespace (including the ASCII separators `0x1C..=0x1F`), and counts
    /// characters rather than bytes.
    pub fn validate<'b>(&self, body: Option<&'b Value>) -> Result<&'b str, ServiceError> {
        let text = body
            .and_then(|body| body.get(TEXT_FIELD))
            .and_then(Value::as_str)
            .ok_or(ServiceError::BadRequest)?;

        if trim_whitespace(text).chars().count() < self.config.min_text_chars {
            return Err(ServiceError::BadRequest);
        }

        Ok(text)
    }

    fn run(&self, body: Option<&Value>) -> Result<PredictionResult, ServiceError> {
        let (vectorizer, model) = match &self.context {
            ModelContext::Loaded { vectorizer, model } => (vectorizer.as_ref(), model.as_ref()),
            ModelContext::Unavailable { .. } => return Err(ServiceError::ServiceUnavailable),
        };

        let raw = self.validate(body)?;

        panic::catch_unwind(AssertUnwindSafe(|| self.infer(vectorizer, model, raw)))
            .unwrap_or_else(|payload| Err(ModelError::Panicked(panic_message(payload))))
            .map_err(|err| {
                error!(error = ?err, text_chars = raw.chars().count(), "prediction failed");
                ServiceError::Internal(err.to_string())
            })
    }

    fn infer(
        &self,
        vectorizer: &dyn Vectorizer,
        model: &dyn ModelProvider,
        raw: &str,
    ) -> Result<PredictionResult, ModelError> {
        let canonical_text = self.normalizer.normalize(raw);
        debug_assert!(
            self.normalizer.config() != NormalizerConfig::default() || is_canonical(&canonical_text),
            "normalizer emitted non-canonical text"
        );

        let x = vectorizer.transform(&canonical_text)?;
        let raw_label = model.predict(&x)?;
        let proba = model.predict_proba(&x)?;

        if let Some(&p) = proba.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ModelError::InvalidProbability(p));
        }
        let best = argmax(&proba).ok_or(ModelError::EmptyDistribution)?;
        let confidence = proba[best];

        if model.classes().get(best).map(String::as_str) != Some(raw_label.as_str()) {
            debug!(
                raw_label = %raw_label,
                argmax_class = ?model.classes().get(best),
                "predicted label differs from the most probable class"
            );
        }

        let display_label = self.config.labels.resolve(&raw_label);
        if let DisplayLabel::Unrecognized(raw_value) = &display_label {
            warn!(raw_label = %raw_value, "model returned a label outside the label map");
        }

        let result = PredictionResult {
            raw_label,
            display_label,
            confidence: round_confidence(f64::from(confidence)),
            canonical_text,
        };
        debug!(%result, "prediction served");

        Ok(result)
    }
}
