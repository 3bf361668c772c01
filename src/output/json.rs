//! JSON output formatting
//!
//! Serializes the complete [`RunStats`] (counts, per-kind failures, latency
//! summary, throughput) together with the settings the run used.

use crate::config::{format_timeout, Config};
use crate::stats::RunStats;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Settings echoed into the report
#[derive(Debug, Clone, Serialize)]
pub struct JsonRunInfo {
    pub endpoint: String,
    pub workers: usize,
    pub timeout: String,
}

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub timestamp: String,
    pub run: JsonRunInfo,
    pub stats: &'a RunStats,
}

impl<'a> JsonReport<'a> {
    pub fn new(config: &Config, stats: &'a RunStats) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            run: JsonRunInfo {
                endpoint: config.endpoint.clone(),
                workers: config.workers,
                timeout: format_timeout(config.timeout),
            },
            stats,
        }
    }
}

/// Render the report as pretty-printed JSON
pub fn render_json(config: &Config, stats: &RunStats) -> Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(config, stats))
        .context("Failed to serialize JSON report")
}

/// Write the report to `path`
pub fn write_json(path: &Path, config: &Config, stats: &RunStats) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &JsonReport::new(config, stats))
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
    Ok(())
}
