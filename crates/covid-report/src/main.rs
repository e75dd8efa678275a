//! Main entry point for covid-report.

use anyhow::Result;
use clap::Parser;
use covid_common::init_logging;
use covid_report::{run, Cli};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The site configuration carries the logging settings, so it is loaded
    // before the subscriber exists.
    let config = cli.site_config()?;
    init_logging(&cli.logging_config(&config))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting covid-report");
    run(&cli, &config).await
}
