//! SchemaScan command-line library.
//!
//! Wires configuration, an introspection adapter, the rule engine, and the
//! reporters together. The binary in `main.rs` is a thin shell over
//! [`scan`] and the [`report`] functions so that the pipeline can be
//! exercised from tests.

pub mod config;
pub mod report;

use schemascan_core::{
    HeuristicConfig, Issue, IssueSummary, RuleEngine, adapters::create_adapter,
    redact_database_url,
};
use tracing::{error, info};

pub use config::{AppConfig, Cli};

/// Collects the schema behind `database_url` and runs the default rules
/// over it.
///
/// # Errors
/// Returns error if the adapter cannot be created, the connection check
/// fails, or the collected schema is invalid. Rule failures do not abort
/// the scan; they surface as diagnostic issues.
pub async fn scan(
    database_url: &str,
    heuristics: &HeuristicConfig,
) -> schemascan_core::Result<Vec<Issue>> {
    info!("Target: {}", redact_database_url(database_url));

    let adapter = create_adapter(database_url).await.map_err(|e| {
        error!("Failed to create database adapter: {}", e);
        e
    })?;
    info!("Created {} adapter", adapter.database_type());

    adapter.test_connection().await.map_err(|e| {
        error!("Connection test failed: {}", e);
        e
    })?;

    let schema = adapter.collect_schema().await.map_err(|e| {
        error!("Schema collection failed: {}", e);
        e
    })?;
    info!("Found {} tables", schema.tables.len());

    let engine = RuleEngine::with_default_rules(heuristics);
    let issues = engine.run(&schema);

    info!("Scan completed: {}", IssueSummary::from_issues(&issues));
    Ok(issues)
}
