//! Tracing setup
//!
//! Failures are logged per exchange at `warn`. They only reach stderr when
//! verbose output is requested; otherwise the default filter lets through
//! errors alone. `RUST_LOG` overrides both defaults.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive used when no `RUST_LOG` is set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "netpulse=debug"
    } else {
        "error"
    }
}

/// Install the global subscriber writing to stderr
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(verbose),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{perform_exchange, FailureKind, Outcome};
    use crate::test_support::closed_endpoint;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run a refused exchange under the default filter and return what was logged
    async fn log_refused_exchange(verbose: bool) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            )
            .with(EnvFilter::new(default_directive(verbose)));

        let endpoint = closed_endpoint().await;
        let _guard = tracing::subscriber::set_default(subscriber);
        let outcome = perform_exchange(&endpoint, Some(Duration::from_secs(5))).await;
        assert_eq!(outcome, Outcome::Failure { kind: FailureKind::Connect });

        captured.text()
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true), "netpulse=debug");
        assert_eq!(default_directive(false), "error");
    }

    #[tokio::test]
    async fn test_verbose_logs_failure_cause() {
        let logged = log_refused_exchange(true).await;
        assert!(logged.contains("exchange failed"), "logged: {:?}", logged);
        assert!(logged.contains("failed to connect"), "logged: {:?}", logged);
        assert!(logged.contains("kind=connect"), "logged: {:?}", logged);
    }

    #[tokio::test]
    async fn test_quiet_drops_failure_warning() {
        let logged = log_refused_exchange(false).await;
        assert!(!logged.contains("failed to connect"), "logged: {:?}", logged);
    }

    #[test]
    fn test_init_twice() {
        init_tracing(false);
        init_tracing(true);
    }
}
