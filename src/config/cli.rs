//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// NetPulse - concurrent TCP load-testing client
#[derive(Parser, Debug)]
#[command(name = "netpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Total number of requests to issue
    ///
    /// Kept as raw text so a missing or non-numeric value can be answered
    /// with the usage line instead of a parse error.
    #[arg(value_name = "REQUESTS")]
    pub requests: Option<String>,

    /// Number of workers to generate requests in parallel [default: 1]
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Log errors to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Peer address as host:port [default: 127.0.0.1:8000]
    #[arg(short = 'e', long, env = "NETPULSE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Deadline per connect/write/read step (e.g., 500ms, 30s, 2m; 0 disables) [default: 30s]
    #[arg(short = 't', long)]
    pub timeout: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Also write the summary as JSON to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Requested total, or `None` if REQUESTS is missing or not a number
    pub fn requests(&self) -> Option<u64> {
        self.requests.as_deref()?.trim().parse().ok()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == Some(0) {
            anyhow::bail!("workers must be at least 1");
        }
        if let Some(ref timeout) = self.timeout {
            super::parse_timeout(timeout)?;
        }
        Ok(())
    }
}

/// One-line usage message printed for a bad REQUESTS argument
pub fn usage(program: &str) -> String {
    format!("Usage: {} [--workers=WORKERS --verbose] REQUESTS", program)
}
