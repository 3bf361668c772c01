//! Human-readable text output

use crate::client::FailureKind;
use crate::stats::RunStats;
use std::fmt::Write;

/// Render the run summary
///
/// The first five lines are the fixed summary:
/// - error/success counts
/// - per-kind error breakdown
/// - average latency
/// - throughput
/// - elapsed time
///
/// With `with_percentiles`, a latency percentile line follows when at least
/// one exchange succeeded.
pub fn render_summary(stats: &RunStats, with_percentiles: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Errors: {}, Succeeds: {}", stats.errors(), stats.successes());

    let breakdown: Vec<String> = FailureKind::ALL
        .iter()
        .map(|&kind| format!("{}: {}", kind.label(), stats.failures().get(kind)))
        .collect();
    let _ = writeln!(out, "{}", breakdown.join(", "));

    let _ = writeln!(out, "Response time (avg.): {:.6} ms", stats.average_latency_ms());
    let _ = writeln!(out, "Requests per second (avg.): {:.6} req/s", stats.requests_per_second());
    let _ = writeln!(out, "Time spent: {:.6} s", stats.elapsed_seconds());

    if !with_percentiles {
        return out;
    }

    let latency = stats.latency();
    if let (Some(min), Some(p50), Some(p90), Some(p99), Some(max)) =
        (latency.min_ms, latency.p50_ms, latency.p90_ms, latency.p99_ms, latency.max_ms)
    {
        let _ = writeln!(
            out,
            "Latency (ms): min {:.3}, p50 {:.3}, p90 {:.3}, p99 {:.3}, max {:.3}",
            min, p50, p90, p99, max
        );
    }

    out
}

/// Print the run summary to stdout, with percentiles when `verbose`
pub fn print_results(stats: &RunStats, verbose: bool) {
    print!("{}", render_summary(stats, verbose));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Outcome;
    use crate::stats::aggregator::ResultAggregator;
    use std::time::Duration;

    fn mixed_stats() -> RunStats {
        let mut aggregator = ResultAggregator::new(4);
        aggregator.record(Outcome::Success { latency_ms: 2.0 });
        aggregator.record(Outcome::Success { latency_ms: 4.0 });
        aggregator.record(Outcome::Failure { kind: FailureKind::Connect });
        aggregator.record(Outcome::Failure { kind: FailureKind::Integrity });
        aggregator.finish(Duration::from_secs(2))
    }

    #[test]
    fn test_summary_lines() {
        let summary = render_summary(&mixed_stats(), false);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Errors: 2, Succeeds: 2");
        assert_eq!(lines[1], "DNS: 0, Socket: 1, Write: 0, Read: 0, Server: 1, Timeout: 0");
        assert_eq!(lines[2], "Response time (avg.): 3.000000 ms");
        assert_eq!(lines[3], "Requests per second (avg.): 2.000000 req/s");
        assert_eq!(lines[4], "Time spent: 2.000000 s");
        assert!(!summary.contains("Latency (ms)"));
    }

    #[test]
    fn test_verbose_summary_adds_percentiles() {
        let summary = render_summary(&mixed_stats(), true);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Errors: 2, Succeeds: 2");
        assert!(lines[5].starts_with("Latency (ms): min 2.000"));
    }

    #[test]
    fn test_summary_without_successes() {
        let summary = render_summary(&RunStats::empty(), true);

        assert_eq!(summary.lines().count(), 5);
        assert!(summary.starts_with("Errors: 0, Succeeds: 0\n"));
        assert!(summary.contains("Requests per second (avg.): 0.000000 req/s"));
    }
}
