//! Timing utilities
//!
//! Monotonic timestamps for latency measurement, wall-clock epoch seconds for
//! request payloads, and rate calculation for reports.

use std::time::{Duration, Instant};

/// Monotonic timestamp for latency measurements
///
/// Thin wrapper around `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
}

impl Timestamp {
    /// Create a new timestamp representing the current time
    #[inline]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Get the elapsed time since this timestamp
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }
}

/// Current Unix epoch time in whole seconds
pub fn epoch_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Convert a duration to fractional milliseconds
#[inline]
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Calculate a per-second rate from a count and the time it took
///
/// Returns 0 when the duration is zero.
pub fn calculate_rate(count: u64, duration: Duration) -> f64 {
    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}
