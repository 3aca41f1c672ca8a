//! Request counters and ServiceStats.

use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::service::types::PredictionService;

/// A snapshot of request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Prediction requests received.
    pub requests: u64,
    /// Requests answered with a prediction.
    pub succeeded: u64,
    /// Requests rejected for missing or short text.
    pub rejected: u64,
    /// Requests refused because the model is not loaded.
    pub unavailable: u64,
    /// Requests that failed during normalization or inference.
    pub failed: u64,
    /// Successful predictions whose label was not in the label map.
    pub unrecognized_labels: u64,
}

impl PredictionService {
    /// Returns request statistics.
    pub fn stats(&self) -> ServiceStats {
        let c = &self.counters;
        ServiceStats {
            requests: c.requests.load(Ordering::Relaxed),
            succeeded: c.succeeded.load(Ordering::Relaxed),
            rejected: c.rejected.load(Ordering::Relaxed),
            unavailable: c.unavailable.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
            unrecognized_labels: c.unrecognized.load(Ordering::Relaxed),
        }
    }
}

impl ServiceStats {
    /// Requests that ended in any error.
    pub fn errors(&self) -> u64 {
        self.rejected + self.unavailable + self.failed
    }
}

impl core::fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} requests, {} ok, {} rejected, {} unavailable, {} failed",
            self.requests, self.succeeded, self.rejected, self.unavailable, self.failed
        )?;

        if self.unrecognized_labels > 0 {
            write!(f, ", {} unrecognized labels", self.unrecognized_labels)?;
        }

        Ok(())
    }
}
