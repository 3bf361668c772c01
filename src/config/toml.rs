//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
///
/// `requests` is the already-validated REQUESTS positional.
pub fn merge_cli_with_config(cli: &Cli, requests: u64, mut config: Config) -> Result<Config> {
    config.requests = requests;

    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(ref endpoint) = cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(ref timeout) = cli.timeout {
        config.timeout = parse_timeout(timeout)?;
    }
    if cli.verbose {
        config.verbose = true;
    }
    if let Some(ref path) = cli.json_output {
        config.json_output = Some(path.clone());
    }

    Ok(config)
}

/// Build the run configuration from the CLI, loading `--config` if given
pub fn build_config(cli: &Cli, requests: u64) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, requests, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::time::Duration;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("netpulse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_toml_basic() {
        let toml = r#"
            endpoint = "10.0.0.5:9000"
            workers = 8
            timeout = "250ms"
            verbose = true
        "#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.endpoint, "10.0.0.5:9000");
        assert_eq!(config.workers, 8);
        assert_eq!(config.timeout, Some(Duration::from_millis(250)));
        assert!(config.verbose);
        assert_eq!(config.requests, 0);
    }

    #[test]
    fn test_parse_toml_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_toml_disable_timeout() {
        let config = parse_toml_string(r#"timeout = "0""#).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_parse_toml_rejects_bad_values() {
        assert!(parse_toml_string(r#"timeout = "soon""#).is_err());
        assert!(parse_toml_string(r#"workers = "many""#).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let base = parse_toml_string(
            r#"
            endpoint = "10.0.0.5:9000"
            workers = 8
            "#,
        )
        .unwrap();

        let config = merge_cli_with_config(&cli(&["--workers=2", "--timeout=0", "50"]), 50, base).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.endpoint, "10.0.0.5:9000");
        assert_eq!(config.timeout, None);
        assert_eq!(config.requests, 50);
    }

    #[test]
    fn test_build_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "workers = 6").unwrap();
        writeln!(file, "endpoint = \"localhost:7000\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = build_config(&cli(&["--config", &path, "12"]), 12).unwrap();
        assert_eq!(config.workers, 6);
        assert_eq!(config.endpoint, "localhost:7000");
        assert_eq!(config.requests, 12);
    }

    #[test]
    fn test_build_config_missing_file() {
        let err = build_config(&cli(&["--config", "/nonexistent/netpulse.toml", "1"]), 1).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
