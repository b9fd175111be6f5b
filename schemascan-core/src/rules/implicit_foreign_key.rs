//! Detection of columns that look like foreign keys but are not declared as such.

use crate::models::{Column, ConstraintKind, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags FK-like column names that no FOREIGN KEY constraint covers.
///
/// A column name is FK-like when, lowercased, it ends with the configured
/// suffix (and is longer than it), or equals the singular name of another
/// table followed by `id` (`productid` when a `products` table exists).
#[derive(Debug, Clone)]
pub struct ImplicitForeignKeyRule {
    suffix: String,
}

impl Default for ImplicitForeignKeyRule {
    fn default() -> Self {
        Self::new("_id")
    }
}

impl ImplicitForeignKeyRule {
    /// Creates the rule with the given name suffix.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into().to_lowercase(),
        }
    }

    fn looks_like_foreign_key(&self, column: &Column, table: &Table, schema: &DatabaseSchema) -> bool {
        let name = column.name.to_lowercase();
        if name.len() > self.suffix.len() && name.ends_with(&self.suffix) {
            return true;
        }
        schema
            .tables
            .iter()
            .filter(|other| other.name != table.name)
            .any(|other| {
                let mut expected = singularize(&unqualified(&other.name).to_lowercase());
                expected.push_str("id");
                expected == name
            })
    }
}

/// Drops a schema prefix such as `sales.` from a table name.
fn unqualified(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, table)| table)
}

/// Naive English singular form used for table names (`categories` -> `category`).
fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix("sses") {
        format!("{stem}ss")
    } else if let Some(stem) = name.strip_suffix('s').filter(|_| !name.ends_with("ss")) {
        stem.to_string()
    } else {
        name.to_string()
    }
}

impl Rule for ImplicitForeignKeyRule {
    fn name(&self) -> &'static str {
        "implicit_foreign_key"
    }

    fn check_table(
        &self,
        table: &Table,
        schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let issues = table
            .columns
            .iter()
            .filter(|column| !table.is_covered_by(ConstraintKind::ForeignKey, &column.name))
            .filter(|column| self.looks_like_foreign_key(column, table, schema))
            .map(|column| {
                Issue::new(
                    &table.name,
                    IssueCategory::Normalization,
                    Severity::Medium,
                    format!(
                        "The column '{}' in table '{}' might be a foreign key but is not defined as one.",
                        column.name, table.name
                    ),
                    format!(
                        "Define a foreign key constraint on '{}({})' referencing the appropriate table and add an index on it.",
                        table.name, column.name
                    ),
                )
                .with_column(&column.name)
            })
            .collect();
        Ok(issues)
    }
}
