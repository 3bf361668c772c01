//! Result aggregation
//!
//! A single aggregator task owns all counters. Workers never touch shared
//! statistics; they only send immutable [`Outcome`]s over the outcome channel,
//! and the aggregator folds them in one pass.
//!
//! # Barrier
//!
//! [`ResultAggregator::collect`] returns only after exactly `expected`
//! outcomes have been received. Elapsed time is measured from the dispatch
//! start timestamp to the moment the last outcome is consumed.

use super::histogram::LatencyHistogram;
use super::{FailureCounts, LatencySummary, RunStats};
use crate::client::Outcome;
use crate::util::time::{calculate_rate, Timestamp};
use crate::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Folds outcomes into [`RunStats`]
#[derive(Debug)]
pub struct ResultAggregator {
    /// Number of outcomes the run will produce (N)
    expected: u64,
    received: u64,
    successes: u64,
    total_latency_ms: f64,
    failures: FailureCounts,
    histogram: LatencyHistogram,
}

impl ResultAggregator {
    /// Create an aggregator expecting `expected` outcomes
    pub fn new(expected: u64) -> Self {
        Self {
            expected,
            received: 0,
            successes: 0,
            total_latency_ms: 0.0,
            failures: FailureCounts::default(),
            histogram: LatencyHistogram::new(),
        }
    }

    /// Fold one outcome into the running totals
    pub fn record(&mut self, outcome: Outcome) {
        self.received += 1;
        match outcome {
            Outcome::Success { latency_ms } => {
                self.successes += 1;
                self.total_latency_ms += latency_ms;
                self.histogram.record_ms(latency_ms);
            }
            Outcome::Failure { kind } => self.failures.record(kind),
        }
    }

    /// Number of outcomes folded so far
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Whether every expected outcome has been folded
    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    /// Receive outcomes until all `expected` have arrived, then finish
    ///
    /// Fails if the channel closes early, which only happens when a worker
    /// died without reporting.
    pub async fn collect(
        mut self,
        outcomes: &mut mpsc::Receiver<Outcome>,
        started: Timestamp,
    ) -> Result<RunStats> {
        while !self.is_complete() {
            match outcomes.recv().await {
                Some(outcome) => self.record(outcome),
                None => anyhow::bail!(
                    "outcome channel closed after {} of {} outcomes",
                    self.received(),
                    self.expected
                ),
            }
        }

        let elapsed = started.elapsed();
        debug!(
            outcomes = self.received(),
            elapsed_ms = elapsed.as_millis() as u64,
            "all outcomes collected"
        );
        Ok(self.finish(elapsed))
    }

    /// Produce the final statistics for a run that took `elapsed`
    pub fn finish(self, elapsed: Duration) -> RunStats {
        let errors = self.failures.total();

        let average_latency_ms = if self.successes > 0 {
            self.total_latency_ms / self.successes as f64
        } else {
            0.0
        };

        let requests_per_second = if self.received > 0 {
            calculate_rate(self.received, elapsed)
        } else {
            0.0
        };

        let latency = LatencySummary {
            min_ms: self.histogram.min_ms(),
            p50_ms: self.histogram.percentile_ms(50.0),
            p90_ms: self.histogram.percentile_ms(90.0),
            p99_ms: self.histogram.percentile_ms(99.0),
            max_ms: self.histogram.max_ms(),
        };

        RunStats {
            requests: self.received,
            successes: self.successes,
            errors,
            failures: self.failures,
            total_latency_ms: self.total_latency_ms,
            average_latency_ms,
            elapsed_seconds: elapsed.as_secs_f64(),
            requests_per_second,
            latency,
        }
    }
}
