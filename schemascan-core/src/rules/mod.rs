//! Schema issue detection rules.
//!
//! A [`Rule`] inspects one aspect of the schema model and yields zero or
//! more [`Issue`]s. The [`RuleEngine`] owns an ordered rule set and applies
//! every rule to every table, isolating per-(rule, table) failures.
//!
//! # Built-in rules
//! In default registration order:
//! - [`ImplicitForeignKeyRule`]: FK-like column names without a FOREIGN KEY
//! - [`MonetaryPrecisionRule`]: monetary columns not stored as DECIMAL
//! - [`UnindexedForeignKeyRule`]: FOREIGN KEY columns with no leading index
//! - [`NullableCriticalColumnRule`]: nullable PRIMARY KEY / UNIQUE columns
//! - [`MissingPrimaryKeyRule`]: tables without a PRIMARY KEY
//! - [`UnindexedLookupColumnRule`]: lookup columns such as `email` with no index
//! - [`ExpectedColumnTypeRule`]: columns whose type differs from the expected one
//! - [`RequiredColumnNullabilityRule`]: business-required columns that allow NULL
//!
//! # Example
//! ```rust
//! use schemascan_core::models::*;
//! use schemascan_core::rules::{MissingPrimaryKeyRule, Rule};
//!
//! let schema = DatabaseSchema::new(vec![Table::new("audit_log")]);
//! let issues = MissingPrimaryKeyRule.evaluate(&schema).unwrap();
//! assert_eq!(issues.len(), 1);
//! ```

mod config;
mod engine;
mod expected_column_type;
mod implicit_foreign_key;
mod issue;
mod missing_primary_key;
mod monetary_precision;
mod nullable_critical_column;
mod required_column_nullability;
mod unindexed_foreign_key;
mod unindexed_lookup_column;

pub use config::{ConfigValidationError, HeuristicConfig};
pub use engine::{RuleEngine, run};
pub use expected_column_type::ExpectedColumnTypeRule;
pub use implicit_foreign_key::ImplicitForeignKeyRule;
pub use issue::{Issue, IssueCategory, IssueSummary, Severity};
pub use missing_primary_key::MissingPrimaryKeyRule;
pub use monetary_precision::MonetaryPrecisionRule;
pub use nullable_critical_column::NullableCriticalColumnRule;
pub use required_column_nullability::RequiredColumnNullabilityRule;
pub use unindexed_foreign_key::UnindexedForeignKeyRule;
pub use unindexed_lookup_column::UnindexedLookupColumnRule;

use thiserror::Error;

use crate::models::{DatabaseSchema, Table};

/// Failure of one rule while evaluating one table.
///
/// The engine never propagates these; each one becomes a LOW severity
/// diagnostic issue for the affected table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule could not evaluate the table
    #[error("{0}")]
    Internal(String),
    /// The rule panicked; holds the panic message
    #[error("rule panicked: {0}")]
    Panicked(String),
}

/// A unit of detection logic.
///
/// Rules are stateless apart from immutable configuration and must be
/// deterministic: the same table and schema always yield the same issues in
/// the same order (columns in declared order).
pub trait Rule: Send + Sync {
    /// Stable identifier used in logs and diagnostic issues.
    fn name(&self) -> &'static str;

    /// Evaluates the rule against one table.
    ///
    /// `schema` gives access to the other tables for rules that need it.
    fn check_table(&self, table: &Table, schema: &DatabaseSchema)
    -> Result<Vec<Issue>, RuleError>;

    /// Evaluates the rule against every table in schema order.
    ///
    /// Stops at the first failing table; use [`RuleEngine`] for per-table
    /// isolation.
    fn evaluate(&self, schema: &DatabaseSchema) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();
        for table in &schema.tables {
            issues.extend(self.check_table(table, schema)?);
        }
        Ok(issues)
    }
}

/// Case-insensitive membership test against a configured name list.
fn name_in(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    struct FailingRule;

    impl Rule for FailingRule {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn check_table(
            &self,
            table: &Table,
            _schema: &DatabaseSchema,
        ) -> Result<Vec<Issue>, RuleError> {
            Err(RuleError::Internal(format!("cannot read '{}'", table.name)))
        }
    }

    #[test]
    fn test_evaluate_walks_tables_in_order() {
        let schema = DatabaseSchema::new(vec![Table::new("b"), Table::new("a")]);
        let issues = MissingPrimaryKeyRule.evaluate(&schema).unwrap();
        let tables: Vec<&str> = issues.iter().map(|i| i.table.as_str()).collect();
        assert_eq!(tables, vec!["b", "a"]);
    }

    #[test]
    fn test_evaluate_stops_at_first_error() {
        let schema = DatabaseSchema::new(vec![Table::new("orders"), Table::new("users")]);
        let err = FailingRule.evaluate(&schema).unwrap_err();
        assert_eq!(err, RuleError::Internal("cannot read 'orders'".to_string()));
    }

    #[test]
    fn test_name_in_is_case_insensitive() {
        let list = vec!["email".to_string()];
        assert!(name_in(&list, "EMAIL"));
        assert!(name_in(&list, "Email"));
        assert!(!name_in(&list, "email_address"));
    }
}
