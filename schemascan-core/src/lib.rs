//! Core library for SchemaScan.
//!
//! SchemaScan inspects the structural metadata of a relational schema and
//! flags likely design flaws: missing referential integrity, imprecise
//! column types, missing indexes, and risky nullability. It relies on
//! naming conventions and declared metadata only; it never reads rows.
//!
//! # Layout
//! - [`models`]: the read-only schema model handed to the engine
//! - [`rules`]: the [`Rule`] trait, the built-in rules, and the [`RuleEngine`]
//! - [`adapters`]: read-only catalog introspection for SQLite and PostgreSQL
//! - [`validation`]: model invariant checks run by the adapters
//!
//! # Example
//! ```rust
//! use schemascan_core::models::*;
//! use schemascan_core::rules::{HeuristicConfig, RuleEngine};
//!
//! let schema = DatabaseSchema::new(vec![
//!     Table::new("orders")
//!         .with_column(Column::new("user_id", DataType::new(ColumnType::Integer, "INTEGER")).not_null()),
//! ]);
//!
//! let engine = RuleEngine::with_default_rules(&HeuristicConfig::default());
//! let issues = engine.run(&schema);
//! assert!(issues.iter().any(|i| i.column.as_deref() == Some("user_id")));
//! ```

pub mod adapters;
pub mod error;
pub mod logging;
pub mod models;
pub mod rules;
pub mod validation;

// Re-export commonly used types
pub use adapters::{ConnectionConfig, DatabaseAdapter, DatabaseType, create_adapter};
pub use error::{Result, SchemaScanError, redact_database_url};
pub use models::{
    Column, ColumnType, Constraint, ConstraintKind, DataType, DatabaseSchema, ForeignKeyReference,
    Index, Table,
};
pub use rules::{
    HeuristicConfig, Issue, IssueCategory, IssueSummary, Rule, RuleEngine, RuleError, Severity,
};
pub use validation::{SchemaValidationError, validate_schema};
