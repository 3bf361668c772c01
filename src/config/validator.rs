//! Configuration validation

use super::*;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workers(config.workers)?;
    validate_endpoint(&config.endpoint)?;
    Ok(())
}

/// Validate worker count
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        anyhow::bail!("workers must be at least 1");
    }
    Ok(())
}

/// Validate that the endpoint looks like `host:port`
///
/// Name resolution itself is left to each exchange, where failing to
/// resolve is a classified per-request failure rather than a config error.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        anyhow::bail!("endpoint must not be empty");
    }

    let Some((host, port)) = endpoint.rsplit_once(':') else {
        anyhow::bail!("endpoint '{}' must be host:port", endpoint);
    };
    if host.is_empty() {
        anyhow::bail!("endpoint '{}' is missing a host", endpoint);
    }
    if port.parse::<u16>().is_err() {
        anyhow::bail!("endpoint '{}' has invalid port '{}'", endpoint, port);
    }

    Ok(())
}
