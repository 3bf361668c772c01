//! Dispatcher
//!
//! Seeds a bounded work queue with exactly N units, starts a fixed-size pool
//! of worker tasks on it, and waits at the barrier until the aggregator has
//! seen all N outcomes.
//!
//! # Run phases
//!
//! ```text
//! seed queue (N units)  ->  spawn min(workers, N) tasks  ->  aggregate N outcomes
//!                                                        ->  join workers
//! ```
//!
//! The clock starts before the first unit is enqueued and stops when the
//! last outcome is consumed. After the barrier, every worker handle is joined
//! so no task outlives the run.
//!
//! # Example
//!
//! ```no_run
//! use netpulse::client::TcpExchange;
//! use netpulse::dispatcher::Dispatcher;
//! use std::time::Duration;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let exchange = TcpExchange::new("127.0.0.1:8000", Some(Duration::from_secs(30)));
//! let stats = Dispatcher::new(exchange, 4).run(1000).await?;
//! println!("{} ok, {} failed", stats.successes(), stats.errors());
//! # Ok(())
//! # }
//! ```

use crate::client::{Exchange, TcpExchange};
use crate::config::Config;
use crate::stats::aggregator::ResultAggregator;
use crate::stats::RunStats;
use crate::util::time::Timestamp;
use crate::worker::{WorkQueue, WorkUnit, Worker};
use crate::Result;
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Runs a fixed amount of work across a bounded worker pool
pub struct Dispatcher<E> {
    exchange: Arc<E>,
    workers: usize,
}

impl<E: Exchange> Dispatcher<E> {
    /// Create a dispatcher running `workers` concurrent tasks
    pub fn new(exchange: E, workers: usize) -> Self {
        Self {
            exchange: Arc::new(exchange),
            workers,
        }
    }

    /// Issue `requests` exchanges and return the run's statistics
    ///
    /// Returns only after all `requests` outcomes have been aggregated and
    /// every worker has stopped. With zero requests no worker is started and
    /// no network I/O happens.
    pub async fn run(&self, requests: u64) -> Result<RunStats> {
        if self.workers == 0 {
            anyhow::bail!("worker count must be at least 1");
        }
        if requests == 0 {
            debug!("no requests to dispatch");
            return Ok(RunStats::empty());
        }

        let capacity = usize::try_from(requests)
            .with_context(|| format!("{} requests exceed addressable queue size", requests))?;

        let started = Timestamp::now();

        let queue = Arc::new(WorkQueue::new(capacity));
        for _ in 0..capacity {
            queue
                .push(WorkUnit)
                .map_err(|_| anyhow::anyhow!("work queue rejected unit beyond capacity {}", capacity))?;
        }

        let (outcome_tx, mut outcome_rx) = mpsc::channel(capacity);

        let pool_size = self.workers.min(capacity);
        info!(requests, workers = pool_size, "dispatching");

        let handles: Vec<_> = (0..pool_size)
            .map(|id| {
                let worker = Worker::new(
                    id,
                    Arc::clone(&queue),
                    outcome_tx.clone(),
                    Arc::clone(&self.exchange),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        // Only workers hold senders now; the channel closes if they all stop
        drop(outcome_tx);

        let stats = ResultAggregator::new(requests)
            .collect(&mut outcome_rx, started)
            .await;

        // Shutdown: the queue is drained, so every worker is returning
        let mut completed = 0u64;
        for handle in handles {
            completed += handle.await.context("worker task failed")?;
        }
        debug!(completed, "worker pool stopped");

        stats
    }
}

/// Run a complete load test as described by `config`
pub async fn run_load(config: &Config) -> Result<RunStats> {
    let exchange = TcpExchange::new(config.endpoint.clone(), config.timeout);
    Dispatcher::new(exchange, config.workers)
        .run(config.requests)
        .await
}
