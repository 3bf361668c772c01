//! Latency histogram using HdrHistogram
//!
//! Records round-trip latencies of successful exchanges at microsecond
//! resolution so the final report can show percentiles next to the mean.
//!
//! # Example
//!
//! ```
//! use netpulse::stats::histogram::LatencyHistogram;
//!
//! let mut hist = LatencyHistogram::new();
//! hist.record_ms(1.25);
//! hist.record_ms(2.0);
//! hist.record_ms(40.0);
//!
//! let p50 = hist.percentile_ms(50.0).unwrap();
//! assert!(p50 >= 1.9 && p50 <= 2.1);
//! ```

use hdrhistogram::Histogram;

/// Highest trackable latency: 1 hour in microseconds
const MAX_MICROS: u64 = 3_600_000_000;

/// Latency histogram wrapper
///
/// Tracks latencies from 1 microsecond to 1 hour with 3 significant digits,
/// so recorded values are accurate to within 0.1%. Values outside that range
/// are clamped.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_MICROS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record one latency sample given in milliseconds
    #[inline]
    pub fn record_ms(&mut self, latency_ms: f64) {
        let micros = (latency_ms * 1000.0).round();
        // NaN and negatives clamp to the lowest bucket
        let value = if micros.is_finite() && micros > 1.0 {
            (micros as u64).min(MAX_MICROS)
        } else {
            1
        };
        let _ = self.histogram.record(value);
    }

    /// Latency at `percentile` (0.0 - 100.0) in milliseconds
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn percentile_ms(&self, percentile: f64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(micros_to_ms(self.histogram.value_at_percentile(percentile)))
    }

    /// Smallest recorded latency in milliseconds
    pub fn min_ms(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(micros_to_ms(self.histogram.min()))
    }

    /// Largest recorded latency in milliseconds
    pub fn max_ms(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(micros_to_ms(self.histogram.max()))
    }

    /// Number of samples recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

fn micros_to_ms(micros: u64) -> f64 {
    micros as f64 / 1000.0
}
