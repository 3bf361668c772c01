//! Worker task implementation
//!
//! A worker repeatedly takes one [`WorkUnit`] off the shared queue, performs
//! exactly one exchange for it, and publishes the resulting [`Outcome`] to the
//! aggregator. Publishing the outcome is the completion signal for that unit.
//!
//! # Lifecycle
//!
//! The dispatcher fully seeds the queue before any worker starts, so an empty
//! queue means there is no more work. A worker returns as soon as its `pop`
//! finds the queue empty, or if the aggregator has gone away. Workers never
//! outlive the run.

use crate::client::{Exchange, Outcome};
use crossbeam::queue::ArrayQueue;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Token representing one request to send
///
/// Carries no payload; only the number of units matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit;

/// Bounded multi-consumer queue of pending work
pub type WorkQueue = ArrayQueue<WorkUnit>;

/// Concurrent task draining the work queue
pub struct Worker<E> {
    /// Worker ID (for identification in logs)
    id: usize,

    /// Shared pending work
    queue: Arc<WorkQueue>,

    /// Outcome channel to the aggregator
    outcomes: mpsc::Sender<Outcome>,

    /// Exchange performed once per unit
    exchange: Arc<E>,
}

impl<E: Exchange> Worker<E> {
    pub fn new(
        id: usize,
        queue: Arc<WorkQueue>,
        outcomes: mpsc::Sender<Outcome>,
        exchange: Arc<E>,
    ) -> Self {
        Self {
            id,
            queue,
            outcomes,
            exchange,
        }
    }

    /// Drain the queue, returning the number of units completed
    pub async fn run(self) -> u64 {
        let mut completed = 0u64;

        while let Some(WorkUnit) = self.queue.pop() {
            let outcome = self.exchange.exchange().await;
            trace!(worker = self.id, ?outcome, "unit complete");

            if self.outcomes.send(outcome).await.is_err() {
                debug!(worker = self.id, "aggregator gone, stopping early");
                break;
            }
            completed += 1;
        }

        debug!(worker = self.id, completed, "worker finished");
        completed
    }
}
