//! Service types.

use std::sync::atomic::AtomicU64;

use senti_types::ServiceConfig;
use serde_json::Value;

use crate::analyzer::normalizer::TextNormalizer;
use crate::context::ModelContext;

/// Name of the request field holding the text to classify.
pub const TEXT_FIELD: &str = "text";

/// HTTP-shaped answer to a prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// JSON body.
    pub body: Value,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub requests: AtomicU64,
    pub succeeded: AtomicU64,
    pub rejected: AtomicU64,
    pub unavailable: AtomicU64,
    pub failed: AtomicU64,
    pub unrecognized: AtomicU64,
}

/// Sentiment prediction service.
///
/// Holds the resident [`ModelContext`] and only reads from it, so a single
/// instance can be shared by every request handler.
#[derive(Debug)]
pub struct PredictionService {
    pub(crate) context: ModelContext,
    pub(crate) normalizer: TextNormalizer,
    pub(crate) config: ServiceConfig,
    pub(crate) counters: Counters,
}

impl PredictionService {
    /// Creates a service with the default configuration.
    pub fn new(context: ModelContext) -> Self {
        Self::with_config(context, ServiceConfig::default())
    }

    /// Creates a service with a custom configuration.
    pub fn with_config(context: ModelContext, config: ServiceConfig) -> Self {
        Self {
            context,
            normalizer: TextNormalizer::default(),
            config,
            counters: Counters::default(),
        }
    }

    /// Returns `true` if the model loaded and predictions can be served.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.context.is_loaded()
    }

    /// Returns the active configuration.
    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the normalizer applied to request text.
    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }
}
