//! bboard CLI
//!
//! Scrapes the latest notices from ZJU college websites and writes the
//! aggregated JSON document. Set `ZJU_USERNAME`/`ZJU_PASSWORD` to access
//! intranet-only listings through the WebVPN gateway; without them the
//! public fallback URLs are used.

use std::path::PathBuf;

use bboard::{
    error::Result,
    models::Config,
    pipeline,
    services::Credentials,
    storage::{LocalStorage, ReportStorage},
};
use clap::Parser;

/// bboard - ZJU college bulletin board aggregator
#[derive(Parser, Debug)]
#[command(
    name = "bboard",
    version,
    about = "Aggregates the latest notices from ZJU college bulletin boards"
)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Output file for the aggregated JSON document
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("=== ZJU Bulletin Board Scraper ===");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(path) = cli.output {
        config.output_path = path;
    }
    config.validate()?;

    let report = pipeline::run_scraper(&config, Credentials::from_env()).await?;

    let storage = LocalStorage::new(&config.output_path);
    let summary = storage.write_report(&report).await?;

    log::info!(
        "Wrote {} items to {}",
        summary.item_count,
        summary.path.display()
    );
    log::info!("Updated at: {}", report.updated_at);

    Ok(())
}
