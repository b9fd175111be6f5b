//! Schema issue detection tool.
//!
//! This binary reads catalog metadata from a database, runs the built-in
//! schema rules over it, and reports the findings on stdout and optionally
//! as a CSV file.
//!
//! # Security Guarantees
//! - Read-only database operations only
//! - No credentials stored or logged
//! - Table contents are never queried

use anyhow::Context;
use clap::Parser;
use schemascan::{
    AppConfig, Cli,
    report::{render_console, write_csv},
    scan,
};
use schemascan_core::logging::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = AppConfig::from_cli(&cli).map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let issues = scan(&config.database_url, &config.heuristics).await?;

    render_console(&issues, &mut std::io::stdout().lock()).context("Failed to print report")?;

    if config.export_csv {
        write_csv(&issues, &config.export_path).map_err(|e| {
            error!("CSV export failed: {}", e);
            e
        })?;
        info!("✓ Findings exported to {}", config.export_path.display());
        println!(
            "Results have been exported to {}",
            config.export_path.display()
        );
    } else if !issues.is_empty() {
        println!("No export selected.");
    }

    Ok(())
}
