//! Prediction serving.
//!
//! Request flow, one linear pass with no retries:
//! 1. Availability: an unloaded model short-circuits to "service unavailable"
//! 2. Validation: `text` must be a string of at least `min_text_chars` trimmed characters
//! 3. Normalization, vectorization and inference on the resident model
//! 4. Label mapping and response shaping
//!
//! Threading:
//! - [`PredictionService`] is `Send + Sync`. The model context is read-only and
//!   the request counters are relaxed atomics, so one instance serves every
//!   worker without locking.

mod api;
mod stats;
mod types;

pub use stats::ServiceStats;
pub use types::{PredictionService, Reply, TEXT_FIELD};
