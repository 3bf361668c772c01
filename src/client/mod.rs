//! Wire protocol client
//!
//! Performs one complete request/response exchange over a fresh TCP
//! connection and classifies the result. Every failure is converted into an
//! [`Outcome::Failure`] carrying a [`FailureKind`]; nothing in here aborts a
//! run.
//!
//! # Exchange
//!
//! ```text
//! resolve -> connect -> [start clock] -> write 8 bytes -> read 8 bytes
//!         -> compare -> [stop clock]
//! ```
//!
//! Each network step (resolve, connect, write, read) runs under an optional
//! per-step deadline. Exceeding it yields [`FailureKind::Timeout`]. The
//! connection is dropped, and therefore closed, on every return path.
//!
//! # Example
//!
//! ```no_run
//! use netpulse::client::{perform_exchange, Outcome};
//! use std::time::Duration;
//!
//! # async fn demo() {
//! match perform_exchange("127.0.0.1:8000", Some(Duration::from_secs(30))).await {
//!     Outcome::Success { latency_ms } => println!("round trip: {:.3} ms", latency_ms),
//!     Outcome::Failure { kind } => println!("failed: {}", kind),
//! }
//! # }
//! ```

use crate::protocol::{self, CodecError, Envelope, ENVELOPE_LEN};
use crate::util::time::{as_millis_f64, epoch_seconds, Timestamp};
use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tracing::{trace, warn};

/// Classification of a failed exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Endpoint could not be resolved to an address
    Resolve,
    /// TCP connection could not be established
    Connect,
    /// Request could not be encoded or fully written
    Write,
    /// Response could not be fully read
    Read,
    /// Response did not carry the value that was sent
    Integrity,
    /// A step exceeded its deadline
    Timeout,
}

impl FailureKind {
    /// All failure kinds, in reporting order
    pub const ALL: [FailureKind; 6] = [
        FailureKind::Resolve,
        FailureKind::Connect,
        FailureKind::Write,
        FailureKind::Read,
        FailureKind::Integrity,
        FailureKind::Timeout,
    ];

    /// Short label used in the text summary
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Resolve => "DNS",
            FailureKind::Connect => "Socket",
            FailureKind::Write => "Write",
            FailureKind::Read => "Read",
            FailureKind::Integrity => "Server",
            FailureKind::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Resolve => "resolve",
            FailureKind::Connect => "connect",
            FailureKind::Write => "write",
            FailureKind::Read => "read",
            FailureKind::Integrity => "integrity",
            FailureKind::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// Result of one exchange attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Peer echoed the request; latency measured from after connect to after
    /// the response was verified
    Success { latency_ms: f64 },
    /// Exchange failed at the classified step
    Failure { kind: FailureKind },
}

/// Cause of a failed exchange
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("{0} resolved to no addresses")]
    NoAddress(String),

    #[error("failed to connect: {0}")]
    Connect(#[source] io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[source] CodecError),

    #[error("failed to write request: {0}")]
    Write(#[source] io::Error),

    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[source] CodecError),

    #[error("Integrity error - reply: {received}, epoch: {sent}")]
    Mismatch { sent: i64, received: i64 },

    #[error("{step} exceeded deadline of {deadline:?}")]
    Timeout {
        step: &'static str,
        deadline: Duration,
    },
}

impl ExchangeError {
    /// Failure kind this error is reported as
    pub fn kind(&self) -> FailureKind {
        match self {
            ExchangeError::Resolve { .. } | ExchangeError::NoAddress(_) => FailureKind::Resolve,
            ExchangeError::Connect(_) => FailureKind::Connect,
            ExchangeError::Encode(_) | ExchangeError::Write(_) => FailureKind::Write,
            ExchangeError::Read(_) => FailureKind::Read,
            ExchangeError::Decode(_) | ExchangeError::Mismatch { .. } => FailureKind::Integrity,
            ExchangeError::Timeout { .. } => FailureKind::Timeout,
        }
    }
}

/// One unit of request work, as seen by a worker
///
/// Implementations must produce exactly one [`Outcome`] per call and must not
/// retry. The worker pool is generic over this trait so it can be driven by
/// something other than a real socket in tests.
pub trait Exchange: Send + Sync + 'static {
    /// Perform a single attempt and classify it
    fn exchange(&self) -> impl Future<Output = Outcome> + Send;
}

/// [`Exchange`] over a fresh TCP connection per call
#[derive(Debug, Clone)]
pub struct TcpExchange {
    endpoint: String,
    deadline: Option<Duration>,
}

impl TcpExchange {
    /// Exchange against `endpoint` (`host:port`) with a per-step deadline
    pub fn new(endpoint: impl Into<String>, deadline: Option<Duration>) -> Self {
        Self {
            endpoint: endpoint.into(),
            deadline,
        }
    }
}

impl Exchange for TcpExchange {
    fn exchange(&self) -> impl Future<Output = Outcome> + Send {
        perform_exchange(&self.endpoint, self.deadline)
    }
}

/// Perform one request/response exchange against `endpoint`
///
/// `deadline` bounds each individual step; `None` lets every step block for
/// as long as the OS allows. Failures are logged at `warn` with their cause.
pub async fn perform_exchange(endpoint: &str, deadline: Option<Duration>) -> Outcome {
    match exchange(endpoint, deadline).await {
        Ok(latency) => {
            let latency_ms = as_millis_f64(latency);
            trace!(endpoint, latency_ms, "exchange succeeded");
            Outcome::Success { latency_ms }
        }
        Err(e) => {
            let kind = e.kind();
            warn!(endpoint, %kind, error = %e, "exchange failed");
            Outcome::Failure { kind }
        }
    }
}

/// Run the exchange, returning the measured round-trip time
async fn exchange(endpoint: &str, deadline: Option<Duration>) -> Result<Duration, ExchangeError> {
    let addr = with_deadline(deadline, "resolve", async {
        lookup_host(endpoint)
            .await
            .map_err(|source| ExchangeError::Resolve {
                endpoint: endpoint.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| ExchangeError::NoAddress(endpoint.to_string()))
    })
    .await?;

    let mut stream = with_deadline(deadline, "connect", async {
        TcpStream::connect(addr).await.map_err(ExchangeError::Connect)
    })
    .await?;

    let start = Timestamp::now();

    let sent = epoch_seconds();
    let request = protocol::encode_envelope(sent).map_err(ExchangeError::Encode)?;
    with_deadline(deadline, "write", async {
        stream.write_all(&request).await.map_err(ExchangeError::Write)
    })
    .await?;

    let mut response: Envelope = [0u8; ENVELOPE_LEN];
    with_deadline(deadline, "read", async {
        stream
            .read_exact(&mut response)
            .await
            .map(|_| ())
            .map_err(ExchangeError::Read)
    })
    .await?;

    let received = protocol::decode_envelope(&response).map_err(ExchangeError::Decode)?;
    if received != sent {
        return Err(ExchangeError::Mismatch { sent, received });
    }

    Ok(start.elapsed())
}

/// Await `step`, failing with [`ExchangeError::Timeout`] once `deadline` passes
async fn with_deadline<T, F>(
    deadline: Option<Duration>,
    step: &'static str,
    fut: F,
) -> Result<T, ExchangeError>
where
    F: Future<Output = Result<T, ExchangeError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| ExchangeError::Timeout { step, deadline: limit })?,
        None => fut.await,
    }
}
