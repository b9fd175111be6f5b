//! End-to-end scans of SQLite files through the CLI pipeline.

#![cfg(feature = "sqlite")]
#![allow(clippy::unwrap_used)]

use schemascan::report::{render_console, write_csv};
use schemascan::scan;
use schemascan_core::HeuristicConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};

const INVENTORY_SCHEMA: &[&str] = &[
    "CREATE TABLE products (
        id INTEGER PRIMARY KEY,
        product_name TEXT NOT NULL,
        price REAL NOT NULL
    )",
    "CREATE TABLE stock_moves (
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL
    )",
];

/// Creates a SQLite file under `dir` holding `statements` and returns its URL.
async fn create_database(dir: &Path, statements: &[&str]) -> String {
    let path: PathBuf = dir.join("inventory.db");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true),
        )
        .await
        .unwrap();
    for statement in statements {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool.close().await;

    format!("sqlite://{}", path.display())
}

#[tokio::test]
async fn test_sqlite_scan_reports_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let url = create_database(dir.path(), INVENTORY_SCHEMA).await;

    let issues = scan(&url, &HeuristicConfig::default()).await.unwrap();

    // Implicit foreign key, then monetary type, then missing primary key
    let findings: Vec<(&str, Option<&str>, &str)> = issues
        .iter()
        .map(|i| (i.table.as_str(), i.column.as_deref(), i.category.as_str()))
        .collect();
    assert_eq!(
        findings,
        vec![
            ("stock_moves", Some("product_id"), "NORMALIZATION"),
            ("products", Some("price"), "DATA_TYPE"),
            ("stock_moves", None, "NORMALIZATION"),
        ]
    );

    let mut console = Vec::new();
    render_console(&issues, &mut console).unwrap();
    let console = String::from_utf8(console).unwrap();
    assert!(console.starts_with("Schema Issues Detected:\n"));
    assert!(console.contains("Table: stock_moves\nColumn: N/A\n"));

    let export_path = dir.path().join("exports/schema_issues.csv");
    write_csv(&issues, &export_path).unwrap();
    let mut reader = csv::Reader::from_path(&export_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), issues.len());
    assert_eq!(&rows[2][1], "");
}

#[tokio::test]
async fn test_sqlite_scan_clean_schema() {
    let dir = tempfile::tempdir().unwrap();
    let url = create_database(
        dir.path(),
        &["CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            product_name TEXT NOT NULL,
            price DECIMAL(10,2) NOT NULL
        )"],
    )
    .await;

    let issues = scan(&url, &HeuristicConfig::default()).await.unwrap();
    assert!(issues.is_empty(), "unexpected findings: {:?}", issues);

    let mut console = Vec::new();
    render_console(&issues, &mut console).unwrap();
    assert_eq!(
        String::from_utf8(console).unwrap(),
        "No schema issues detected!\n"
    );
}

#[tokio::test]
async fn test_sqlite_scan_honours_heuristics() {
    let dir = tempfile::tempdir().unwrap();
    let url = create_database(dir.path(), INVENTORY_SCHEMA).await;

    let heuristics = HeuristicConfig::default().with_foreign_key_suffix("_ref");
    let issues = scan(&url, &heuristics).await.unwrap();

    assert!(
        !issues
            .iter()
            .any(|i| i.column.as_deref() == Some("product_id"))
    );
}

#[tokio::test]
async fn test_sqlite_scan_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("absent.db").display());

    assert!(scan(&url, &HeuristicConfig::default()).await.is_err());
}

#[tokio::test]
async fn test_unrecognized_url_fails() {
    assert!(
        scan("mysql://localhost/shop", &HeuristicConfig::default())
            .await
            .is_err()
    );
}
