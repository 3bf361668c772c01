//! NetPulse CLI entry point

use anyhow::{Context, Result};
use netpulse::config::cli::{usage, Cli};
use netpulse::config::{toml::build_config, validator::validate_config};
use netpulse::dispatcher::run_load;
use netpulse::output::{json, text};
use netpulse::util::logging::init_tracing;
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // A bad REQUESTS argument is not an error, just a usage hint
    let Some(requests) = cli.requests() else {
        let program = std::env::args().next().unwrap_or_else(|| "netpulse".to_string());
        println!("{}", usage(&program));
        return Ok(());
    };
    cli.validate()?;

    let config = build_config(&cli, requests)?;
    validate_config(&config)?;

    init_tracing(config.verbose);
    debug!(?config, "configuration loaded");

    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?;
    let stats = runtime.block_on(run_load(&config))?;

    text::print_results(&stats, config.verbose);

    if let Some(ref path) = config.json_output {
        json::write_json(path, &config, &stats)?;
        info!(path = %path.display(), "JSON report written");
    }

    Ok(())
}
