//! # sf-runner
//!
//! Main entry point for the spreadfeed system.
//!
//! Builds the spread service and the configured venue adapters, streams
//! until interrupted, then closes every session.
//!
//! # Usage
//!
//! ```bash
//! sf-runner [config.json] --log-level info
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sf_scan::SpreadService;
use tracing::info;

/// Cross-venue perp-futures spread scanner.
#[derive(Parser)]
#[command(name = "sf-runner", about = "Cross-venue perp-futures spread scanner")]
struct Cli {
    /// Configuration file path (JSON). Defaults apply when omitted.
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,

    /// Override the ignore-list path from the config.
    #[arg(long)]
    ignore_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    sf_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "sf-runner");

    // 2. Load configuration
    let mut config = match &cli.config {
        Some(path) => sf_core::config::load_config(path)?,
        None => sf_core::config::AppConfig::default(),
    };
    if let Some(path) = cli.ignore_file {
        config.ignore_tokens_path = path;
    }

    let venues = config.enabled_venues()?;
    info!(
        "sf-runner starting — {} venue(s): {}",
        venues.len(),
        venues
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );

    // 3. Assemble the service and its adapters
    let service = SpreadService::from_config(&config);
    for venue in venues {
        service.add_exchange(sf_venues::registry::create_adapter(venue, &config));
    }

    // 4. Stream until interrupted
    service.start().await;
    info!("streaming — press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 5. Close every session gracefully
    service.stop().await;
    info!("all exchanges closed — goodbye");
    Ok(())
}
