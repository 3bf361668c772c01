//! Run statistics
//!
//! A run produces exactly one [`RunStats`], built by the
//! [`aggregator::ResultAggregator`] after every outcome has arrived. The value
//! is immutable: fields are only readable through accessors.
//!
//! The central invariant is `successes + errors == requests` for every run.
//!
//! # Example
//!
//! ```
//! use netpulse::client::{FailureKind, Outcome};
//! use netpulse::stats::aggregator::ResultAggregator;
//! use std::time::Duration;
//!
//! let mut aggregator = ResultAggregator::new(3);
//! aggregator.record(Outcome::Success { latency_ms: 2.0 });
//! aggregator.record(Outcome::Success { latency_ms: 4.0 });
//! aggregator.record(Outcome::Failure { kind: FailureKind::Connect });
//!
//! let stats = aggregator.finish(Duration::from_secs(1));
//! assert_eq!(stats.successes(), 2);
//! assert_eq!(stats.errors(), 1);
//! assert_eq!(stats.average_latency_ms(), 3.0);
//! assert_eq!(stats.requests_per_second(), 3.0);
//! ```

pub mod aggregator;
pub mod histogram;

use crate::client::FailureKind;
use serde::Serialize;
use std::time::Duration;

/// Failure counts broken down by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub resolve: u64,
    pub connect: u64,
    pub write: u64,
    pub read: u64,
    pub integrity: u64,
    pub timeout: u64,
}

impl FailureCounts {
    /// Count one failure of `kind`
    #[inline]
    pub fn record(&mut self, kind: FailureKind) {
        *self.slot(kind) += 1;
    }

    /// Number of failures of `kind`
    pub fn get(&self, kind: FailureKind) -> u64 {
        match kind {
            FailureKind::Resolve => self.resolve,
            FailureKind::Connect => self.connect,
            FailureKind::Write => self.write,
            FailureKind::Read => self.read,
            FailureKind::Integrity => self.integrity,
            FailureKind::Timeout => self.timeout,
        }
    }

    /// Failures across all kinds
    pub fn total(&self) -> u64 {
        FailureKind::ALL.iter().map(|&kind| self.get(kind)).sum()
    }

    fn slot(&mut self, kind: FailureKind) -> &mut u64 {
        match kind {
            FailureKind::Resolve => &mut self.resolve,
            FailureKind::Connect => &mut self.connect,
            FailureKind::Write => &mut self.write,
            FailureKind::Read => &mut self.read,
            FailureKind::Integrity => &mut self.integrity,
            FailureKind::Timeout => &mut self.timeout,
        }
    }
}

/// Latency distribution of successful exchanges, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub min_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p90_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

/// Aggregate statistics for one complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    requests: u64,
    successes: u64,
    errors: u64,
    failures: FailureCounts,
    total_latency_ms: f64,
    average_latency_ms: f64,
    elapsed_seconds: f64,
    requests_per_second: f64,
    latency: LatencySummary,
}

impl RunStats {
    /// Statistics for a run that issued no requests
    pub fn empty() -> Self {
        Self {
            requests: 0,
            successes: 0,
            errors: 0,
            failures: FailureCounts::default(),
            total_latency_ms: 0.0,
            average_latency_ms: 0.0,
            elapsed_seconds: 0.0,
            requests_per_second: 0.0,
            latency: LatencySummary::default(),
        }
    }

    /// Total requests issued (N)
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Per-kind failure breakdown
    pub fn failures(&self) -> &FailureCounts {
        &self.failures
    }

    /// Sum of latencies over successful exchanges
    pub fn total_latency_ms(&self) -> f64 {
        self.total_latency_ms
    }

    /// Mean latency over successful exchanges, 0 when there were none
    pub fn average_latency_ms(&self) -> f64 {
        self.average_latency_ms
    }

    /// Wall time from first dispatch to last collected outcome
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_seconds)
    }

    /// Throughput over the whole run, 0 for empty or instantaneous runs
    pub fn requests_per_second(&self) -> f64 {
        self.requests_per_second
    }

    pub fn latency(&self) -> &LatencySummary {
        &self.latency
    }
}
