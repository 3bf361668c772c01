//! Test peers and mock exchanges
//!
//! Local TCP peers bound to ephemeral loopback ports, each behaving in one
//! specific way, plus a [`MockExchange`] that lets the worker pool run without
//! any sockets at all.

use crate::client::{Exchange, FailureKind, Outcome};
use crate::protocol::{decode_envelope, encode_envelope, Envelope, ENVELOPE_LEN};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A running peer; stops accepting when dropped
pub struct TestPeer {
    pub endpoint: String,
    max_open: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl TestPeer {
    /// Highest number of connections the peer was serving at once
    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }
}

impl Drop for TestPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn spawn_peer<F, Fut>(max_open: Arc<AtomicUsize>, handler: F) -> TestPeer
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();

    let task = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(handler(stream));
        }
    });

    TestPeer {
        endpoint,
        max_open,
        task,
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<Envelope> {
    let mut request = [0u8; ENVELOPE_LEN];
    stream.read_exact(&mut request).await.ok()?;
    Some(request)
}

/// Peer that returns every request verbatim after `delay`
pub async fn spawn_echo_peer(delay: Duration) -> TestPeer {
    spawn_peer(Arc::default(), move |mut stream| async move {
        if let Some(request) = read_request(&mut stream).await {
            tokio::time::sleep(delay).await;
            let _ = stream.write_all(&request).await;
        }
    })
    .await
}

/// Peer that answers with a different integer than it received
pub async fn spawn_lying_peer() -> TestPeer {
    spawn_peer(Arc::default(), |mut stream| async move {
        if let Some(request) = read_request(&mut stream).await {
            let value = decode_envelope(&request).unwrap();
            let reply = encode_envelope(value + 1).unwrap();
            let _ = stream.write_all(&reply).await;
        }
    })
    .await
}

/// Peer that reads the request and never replies
pub async fn spawn_silent_peer() -> TestPeer {
    spawn_peer(Arc::default(), |mut stream| async move {
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(stream);
    })
    .await
}

/// Peer that replies with fewer than 8 bytes and closes
pub async fn spawn_short_reply_peer() -> TestPeer {
    spawn_peer(Arc::default(), |mut stream| async move {
        if let Some(request) = read_request(&mut stream).await {
            let _ = stream.write_all(&request[..3]).await;
        }
    })
    .await
}

/// Echo peer tracking how many requests it is serving concurrently
///
/// A connection counts from accept until just before its reply is written,
/// so a client cannot start its next exchange while still being counted.
pub async fn spawn_counting_peer(delay: Duration) -> TestPeer {
    let open = Arc::new(AtomicUsize::new(0));
    let max_open = Arc::new(AtomicUsize::new(0));
    let peak = Arc::clone(&max_open);

    spawn_peer(max_open, move |mut stream| {
        let now = open.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        let open = Arc::clone(&open);

        async move {
            let request = read_request(&mut stream).await;
            tokio::time::sleep(delay).await;
            open.fetch_sub(1, Ordering::SeqCst);
            if let Some(request) = request {
                let _ = stream.write_all(&request).await;
            }
        }
    })
    .await
}

/// Loopback endpoint with nothing listening on it
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = listener.local_addr().unwrap().to_string();
    drop(listener);
    endpoint
}

/// Exchange that replays scripted outcomes without touching the network
pub struct MockExchange {
    script: Vec<Outcome>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExchange {
    /// Cycle through `script`, one outcome per call
    pub fn scripted(script: Vec<Outcome>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(latency_ms: f64) -> Self {
        Self::scripted(vec![Outcome::Success { latency_ms }])
    }

    pub fn failing(kind: FailureKind) -> Self {
        Self::scripted(vec![Outcome::Failure { kind }])
    }

    /// Hold every call open for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Exchange for MockExchange {
    fn exchange(&self) -> impl Future<Output = Outcome> + Send {
        async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.script[call % self.script.len()]
        }
    }
}
