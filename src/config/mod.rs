//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//! CLI values take precedence over values loaded from a file, which take
//! precedence over the defaults below.

pub mod cli;
pub mod toml;
pub mod validator;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Endpoint used by this family of tools when none is configured
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:8000";

/// Per-step deadline applied when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Peer address as `host:port`
    pub endpoint: String,
    /// Total number of requests to issue
    pub requests: u64,
    /// Number of concurrent workers
    pub workers: usize,
    /// Deadline for each resolve/connect/write/read step; `None` disables it
    #[serde(with = "duration_str")]
    pub timeout: Option<Duration>,
    /// Log failed exchanges with their cause
    pub verbose: bool,
    /// Write a JSON report here in addition to the text summary
    pub json_output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            requests: 0,
            workers: 1,
            timeout: Some(DEFAULT_TIMEOUT),
            verbose: false,
            json_output: None,
        }
    }
}

/// Parse a deadline string (e.g., "500ms", "30s", "2m")
///
/// A bare number is taken as seconds. Zero in any unit means no deadline.
pub fn parse_timeout(s: &str) -> Result<Option<Duration>> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    let (num_str, unit_ms) = if let Some(num) = s.strip_suffix("ms") {
        (num, 1)
    } else if let Some(num) = s.strip_suffix('s') {
        (num, 1_000)
    } else if let Some(num) = s.strip_suffix('m') {
        (num, 60_000)
    } else {
        (s, 1_000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid number in duration: {}", num_str))?;
    let millis = num
        .checked_mul(unit_ms)
        .with_context(|| format!("Duration too large: {}", s))?;
    let duration = Duration::from_millis(millis);

    Ok((!duration.is_zero()).then_some(duration))
}

/// Format a deadline the way [`parse_timeout`] reads it
pub fn format_timeout(timeout: Option<Duration>) -> String {
    match timeout {
        None => "0".to_string(),
        Some(d) if d.subsec_millis() == 0 => format!("{}s", d.as_secs()),
        Some(d) => format!("{}ms", d.as_millis()),
    }
}

/// Serde adapter storing `Option<Duration>` as a duration string
mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timeout(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_timeout(&s).map_err(serde::de::Error::custom)
    }
}
