//! NetPulse - concurrent TCP load-testing client
//!
//! NetPulse opens N short-lived TCP connections to a fixed endpoint, exchanges
//! an 8-byte timestamp envelope on each, verifies the echoed value, and
//! reports aggregate throughput, latency and error statistics.
//!
//! # Architecture
//!
//! - **Dispatcher**: seeds a bounded queue with N work units, runs the pool
//! - **Workers**: a fixed number of tasks, one exchange per unit
//! - **Client**: one request/response per connection, failure classification
//! - **Aggregator**: folds exactly N outcomes into immutable run statistics

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod output;
pub mod protocol;
pub mod stats;
pub mod util;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use client::{FailureKind, Outcome};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use stats::RunStats;

/// Result type used throughout NetPulse
pub type Result<T> = anyhow::Result<T>;
