//! Core types shared by the sentiment prediction service.
//!
//! This crate holds the vocabulary that both the serving core and the
//! transport speak. Keeping it separate ensures:
//!
//! - **No dependencies**: the types compile without serde, tracing or HTTP crates
//! - **Cross-crate compatibility**: core and server agree on labels and errors
//! - **Clean boundaries**: the transport never reaches into model internals

#![warn(missing_docs)]

use core::fmt;

/// Minimum number of characters (after trimming) a text must have to be classified.
pub const MIN_TEXT_CHARS: usize = 5;

/// Display label returned when the model emits a label outside the label map.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Sentiment classes the classifier was trained on.
///
/// `#[repr(u8)]` keeps the discriminant stable so the class can be used as a
/// compact index (e.g. into per-class counters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Sentiment {
    /// Negative opinion.
    Negative = 0,
    /// Neither negative nor positive.
    Neutral = 1,
    /// Positive opinion.
    Positive = 2,
}

impl Sentiment {
    /// Every sentiment, in discriminant order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    /// Parses a raw model label. Matching is exact: the model is expected to
    /// emit the lowercase English class names it was trained with.
    #[inline]
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            "positive" => Some(Sentiment::Positive),
            _ => None,
        }
    }

    /// Returns the raw label as emitted by the model.
    #[inline(always)]
    pub const fn as_str(self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of mapping a raw model label through a [`LabelMap`].
///
/// An unrecognized label is not an error: it signals drift between the model
/// and the label map and is rendered as [`UNKNOWN_LABEL`] on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLabel {
    /// The raw label was one of the known sentiments.
    Known(&'static str),
    /// The raw label was not in the map; carries the raw value for telemetry.
    Unrecognized(String),
}

impl DisplayLabel {
    /// Returns the label shown to callers.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            DisplayLabel::Known(label) => label,
            DisplayLabel::Unrecognized(_) => UNKNOWN_LABEL,
        }
    }

    /// Returns `true` if the raw label was found in the map.
    #[inline]
    pub const fn is_known(&self) -> bool {
        matches!(self, DisplayLabel::Known(_))
    }
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static mapping from raw sentiment labels to display labels.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMap {
    labels: [&'static str; 3],
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::new("Negativo", "Neutro", "Positivo")
    }
}

impl LabelMap {
    /// Creates a label map from the three display labels.
    pub const fn new(negative: &'static str, neutral: &'static str, positive: &'static str) -> Self {
        Self {
            labels: [negative, neutral, positive],
        }
    }

    /// Returns the display label for a known sentiment.
    #[inline(always)]
    pub const fn get(&self, sentiment: Sentiment) -> &'static str {
        self.labels[sentiment as usize]
    }

    /// Maps a raw model label to its display label.
    pub fn resolve(&self, raw: &str) -> DisplayLabel {
        match Sentiment::from_raw(raw) {
            Some(sentiment) => DisplayLabel::Known(self.get(sentiment)),
            None => DisplayLabel::Unrecognized(raw.to_owned()),
        }
    }
}

/// Rounds a probability to two decimal places.
///
/// Rounds the exact decimal value of `p`, with ties going to the even digit,
/// so `0.625` becomes `0.62` and `0.375` becomes `0.38`.
pub fn round_confidence(p: f64) -> f64 {
    format!("{:.2}", p).parse().unwrap_or(p)
}

/// Result of a successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Label exactly as returned by the model.
    pub raw_label: String,
    /// Label after mapping through the [`LabelMap`].
    pub display_label: DisplayLabel,
    /// Maximum of the model's output distribution, rounded to two decimals.
    pub confidence: f64,
    /// Normalized text that was fed to the vectorizer.
    pub canonical_text: String,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "label={} raw={} confidence={:.2}",
            self.display_label, self.raw_label, self.confidence
        )
    }
}

/// Errors surfaced by the prediction service to its callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The model or vectorizer failed to load at startup.
    ServiceUnavailable,
    /// The request body is missing, has no usable `text`, or the text is too short.
    BadRequest,
    /// Normalization, vectorization or inference failed unexpectedly.
    Internal(String),
}

impl ServiceError {
    /// HTTP status code the error maps to.
    #[inline]
    pub const fn status(&self) -> u16 {
        match self {
            ServiceError::ServiceUnavailable => 503,
            ServiceError::BadRequest => 400,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Message sent to the caller in the `erro` field.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::ServiceUnavailable => "Modelo de IA não está disponível.",
            ServiceError::BadRequest => "Texto não fornecido ou muito curto.",
            ServiceError::Internal(message) => message,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ServiceUnavailable => write!(f, "service unavailable: model not loaded"),
            ServiceError::BadRequest => write!(f, "bad request: text missing or too short"),
            ServiceError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl core::error::Error for ServiceError {}

/// Prediction service configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Minimum trimmed length (in characters) of an accepted text.
    /// Default: [`MIN_TEXT_CHARS`].
    pub min_text_chars: usize,
    /// Display labels for the three sentiments.
    pub labels: LabelMap,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_text_chars: MIN_TEXT_CHARS,
            labels: LabelMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_from_raw() {
        assert_eq!(Sentiment::from_raw("negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_raw("neutral"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_raw("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_raw("Positive"), None);
        assert_eq!(Sentiment::from_raw(""), None);
    }

    #[test]
    fn sentiment_as_str_matches_from_raw() {
        for s in Sentiment::ALL {
            assert_eq!(Sentiment::from_raw(s.as_str()), Some(s));
        }
    }

    #[test]
    fn default_label_map() {
        let map = LabelMap::default();
        assert_eq!(map.resolve("negative"), DisplayLabel::Known("Negativo"));
        assert_eq!(map.resolve("neutral"), DisplayLabel::Known("Neutro"));
        assert_eq!(map.resolve("positive"), DisplayLabel::Known("Positivo"));
    }

    #[test]
    fn unrecognized_label_keeps_raw_value() {
        let label = LabelMap::default().resolve("mixed");
        assert_eq!(label, DisplayLabel::Unrecognized("mixed".to_string()));
        assert!(!label.is_known());
        assert_eq!(label.as_str(), UNKNOWN_LABEL);
        assert_eq!(label.to_string(), "Unknown");
    }

    #[test]
    fn custom_label_map() {
        let map = LabelMap::new("Negative", "Neutral", "Positive");
        assert_eq!(map.get(Sentiment::Positive), "Positive");
        assert_eq!(map.resolve("negative").as_str(), "Negative");
    }

    #[test]
    fn confidence_rounding() {
        assert_eq!(round_confidence(0.8712), 0.87);
        assert_eq!(round_confidence(0.876), 0.88);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
        assert_eq!(round_confidence(0.333333), 0.33);
    }

    #[test]
    fn confidence_ties_round_to_even() {
        assert_eq!(round_confidence(0.625), 0.62);
        assert_eq!(round_confidence(0.375), 0.38);
        assert_eq!(round_confidence(0.125), 0.12);
        assert_eq!(round_confidence(0.875), 0.88);
        // 0.345 is stored just below the tie.
        assert_eq!(round_confidence(0.345), 0.34);
    }

    #[test]
    fn error_status_codes() {
        assert_eq!(ServiceError::ServiceUnavailable.status(), 503);
        assert_eq!(ServiceError::BadRequest.status(), 400);
        assert_eq!(ServiceError::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ServiceError::ServiceUnavailable.message(),
            "Modelo de IA não está disponível."
        );
        assert_eq!(
            ServiceError::BadRequest.message(),
            "Texto não fornecido ou muito curto."
        );
        assert_eq!(ServiceError::Internal("boom".into()).message(), "boom");
    }

    #[test]
    fn prediction_result_display() {
        let result = PredictionResult {
            raw_label: "positive".into(),
            display_label: DisplayLabel::Known("Positivo"),
            confidence: 0.87,
            canonical_text: "adorei".into(),
        };
        assert_eq!(result.to_string(), "label=Positivo raw=positive confidence=0.87");
    }

    #[test]
    fn default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.min_text_chars, 5);
        assert_eq!(config.labels, LabelMap::default());
    }
}
