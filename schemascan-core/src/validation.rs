//! Structural validation of a collected schema model.
//!
//! Adapters call [`validate_schema`] before handing a model to the engine so
//! that the rules can rely on the model invariants: unique table names,
//! unique column names per table, and constraint/index columns that exist in
//! their owning table. Foreign keys must name as many referenced columns as
//! they cover, or none when the target's primary key is implied; referenced
//! columns are not checked against the target table. DECIMAL columns need a
//! non-zero precision that is at least their scale.
//!
//! # Example
//! ```rust
//! use schemascan_core::models::*;
//! use schemascan_core::validation::validate_schema;
//!
//! let schema = DatabaseSchema::new(vec![
//!     Table::new("users")
//!         .with_column(Column::new("id", DataType::new(ColumnType::Integer, "INTEGER")))
//!         .with_constraint(Constraint::primary_key(["id"])),
//! ]);
//! assert!(validate_schema(&schema).is_ok());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{ConstraintKind, DatabaseSchema, Table};

/// Invariant violations found in a schema model.
///
/// Every violation is collected rather than stopping at the first one, so an
/// adapter bug can be diagnosed from a single run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} violation(s): {}", violations.len(), violations.join("; "))]
pub struct SchemaValidationError {
    /// One message per violation, in schema order
    pub violations: Vec<String>,
}

impl SchemaValidationError {
    /// Creates an error from a list of violation messages.
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }
}

/// Checks the schema model invariants.
///
/// # Errors
/// Returns every violation found when the model is not well formed.
pub fn validate_schema(schema: &DatabaseSchema) -> Result<(), SchemaValidationError> {
    let mut violations = Vec::new();
    let mut table_names = HashSet::new();

    for table in &schema.tables {
        if table.name.is_empty() {
            violations.push("table with empty name".to_string());
        }
        if !table_names.insert(table.name.as_str()) {
            violations.push(format!("table '{}' is declared more than once", table.name));
        }
        validate_table(table, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::new(violations))
    }
}

fn validate_table(table: &Table, violations: &mut Vec<String>) {
    let mut column_names = HashSet::new();
    for column in &table.columns {
        if column.name.is_empty() {
            violations.push(format!("table '{}' has a column with empty name", table.name));
        }
        if !column_names.insert(column.name.as_str()) {
            violations.push(format!(
                "table '{}' declares column '{}' twice",
                table.name, column.name
            ));
        }
    }

    for constraint in &table.constraints {
        if constraint.columns.is_empty() && constraint.kind != ConstraintKind::Check {
            violations.push(format!(
                "{} constraint on table '{}' covers no columns",
                constraint.kind, table.name
            ));
        }
        for column in &constraint.columns {
            if !column_names.contains(column.as_str()) {
                violations.push(format!(
                    "{} constraint on table '{}' references unknown column '{}'",
                    constraint.kind, table.name, column
                ));
            }
        }
        if constraint.kind == ConstraintKind::ForeignKey {
            match &constraint.references {
                None => violations.push(format!(
                    "FOREIGN KEY constraint on table '{}' has no referenced table",
                    table.name
                )),
                // An empty list means the target's primary key is implied
                Some(reference)
                    if !reference.columns.is_empty()
                        && reference.columns.len() != constraint.columns.len() =>
                {
                    violations.push(format!(
                        "FOREIGN KEY constraint on table '{}' maps {} column(s) onto {} in '{}'",
                        table.name,
                        constraint.columns.len(),
                        reference.columns.len(),
                        reference.table
                    ));
                }
                Some(_) => {}
            }
        }
    }

    for column in &table.columns {
        if !column.data_type.has_valid_decimal_parameters() {
            violations.push(format!(
                "column '{}.{}' has inconsistent DECIMAL precision/scale ({:?}, {:?})",
                table.name, column.name, column.data_type.precision, column.data_type.scale
            ));
        }
    }

    for index in &table.indexes {
        for column in &index.columns {
            if !column_names.contains(column.as_str()) {
                violations.push(format!(
                    "index '{}' on table '{}' references unknown column '{}'",
                    index.name, table.name, column
                ));
            }
        }
    }
}
