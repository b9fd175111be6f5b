//! Detection of nullable key columns.

use crate::models::{Column, ConstraintKind, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags nullable columns covered by a PRIMARY KEY (HIGH) or UNIQUE (MEDIUM)
/// constraint.
///
/// A column covered by both is reported once, as a primary key finding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableCriticalColumnRule;

impl NullableCriticalColumnRule {
    fn classify(table: &Table, column: &Column) -> Option<Issue> {
        if !column.is_nullable {
            return None;
        }
        if table.is_covered_by(ConstraintKind::PrimaryKey, &column.name) {
            return Some(Issue::new(
                &table.name,
                IssueCategory::Nullability,
                Severity::High,
                format!(
                    "The primary key column '{}' in table '{}' allows NULL values.",
                    column.name, table.name
                ),
                format!(
                    "Alter the column '{}({})' to NOT NULL; primary key values must always be present.",
                    table.name, column.name
                ),
            ));
        }
        if table.is_covered_by(ConstraintKind::Unique, &column.name) {
            return Some(Issue::new(
                &table.name,
                IssueCategory::Nullability,
                Severity::Medium,
                format!(
                    "The unique column '{}' in table '{}' allows NULL values; most databases permit multiple NULLs under a UNIQUE constraint.",
                    column.name, table.name
                ),
                format!(
                    "Alter the column '{}({})' to NOT NULL if every row must carry a distinct value.",
                    table.name, column.name
                ),
            ));
        }
        None
    }
}

impl Rule for NullableCriticalColumnRule {
    fn name(&self) -> &'static str {
        "nullable_critical_column"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        Ok(table
            .columns
            .iter()
            .filter_map(|column| Self::classify(table, column).map(|i| i.with_column(&column.name)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    fn text(name: &str) -> Column {
        Column::new(name, DataType::new(ColumnType::Text, "TEXT"))
    }

    #[test]
    fn test_nullable_primary_key_is_high() {
        let schema = DatabaseSchema::new(vec![
            Table::new("codes")
                .with_column(text("code"))
                .with_constraint(Constraint::primary_key(["code"])),
        ]);
        let issues = NullableCriticalColumnRule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].category, IssueCategory::Nullability);
    }

    #[test]
    fn test_nullable_unique_is_medium() {
        let schema = DatabaseSchema::new(vec![
            Table::new("users")
                .with_column(text("id").not_null())
                .with_column(text("email"))
                .with_constraint(Constraint::primary_key(["id"]))
                .with_constraint(Constraint::unique(["email"])),
        ]);
        let issues = NullableCriticalColumnRule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column.as_deref(), Some("email"));
        assert_eq!(issues[0].severity, Severity::Medium);
        assert!(issues[0].description.contains("multiple NULLs"));
    }

    #[test]
    fn test_primary_key_takes_precedence_over_unique() {
        let schema = DatabaseSchema::new(vec![
            Table::new("t")
                .with_column(text("k"))
                .with_constraint(Constraint::primary_key(["k"]))
                .with_constraint(Constraint::unique(["k"])),
        ]);
        let issues = NullableCriticalColumnRule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::High);
    }

    #[test]
    fn test_not_null_and_unconstrained_columns_pass() {
        let schema = DatabaseSchema::new(vec![
            Table::new("t")
                .with_column(text("k").not_null())
                .with_column(text("note"))
                .with_constraint(Constraint::primary_key(["k"])),
        ]);
        assert!(NullableCriticalColumnRule.evaluate(&schema).unwrap().is_empty());
    }
}
