//! Detection of lookup columns without any index.

use crate::models::{ConstraintKind, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError, name_in};

/// Flags configured lookup columns (default `email`) that no index covers.
///
/// A column in any index position counts as indexed, as does one covered by
/// a PRIMARY KEY or UNIQUE constraint since databases back those with an
/// index.
#[derive(Debug, Clone, Default)]
pub struct UnindexedLookupColumnRule {
    columns: Vec<String>,
}

impl UnindexedLookupColumnRule {
    /// Creates the rule for the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for UnindexedLookupColumnRule {
    fn name(&self) -> &'static str {
        "unindexed_lookup_column"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let issues = table
            .columns
            .iter()
            .filter(|column| name_in(&self.columns, &column.name))
            .filter(|column| {
                !table.is_indexed(&column.name)
                    && !table.is_covered_by(ConstraintKind::PrimaryKey, &column.name)
                    && !table.is_covered_by(ConstraintKind::Unique, &column.name)
            })
            .map(|column| {
                Issue::new(
                    &table.name,
                    IssueCategory::Performance,
                    Severity::Low,
                    format!(
                        "The column '{}' in table '{}' is not indexed.",
                        column.name, table.name
                    ),
                    format!(
                        "Add an index on '{}({})' to improve query performance.",
                        table.name, column.name
                    ),
                )
                .with_column(&column.name)
            })
            .collect();
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    fn text(name: &str) -> Column {
        Column::new(name, DataType::new(ColumnType::Text, "VARCHAR(255)"))
    }

    fn rule() -> UnindexedLookupColumnRule {
        UnindexedLookupColumnRule::new(["email"])
    }

    #[test]
    fn test_unindexed_email_is_flagged() {
        let schema = DatabaseSchema::new(vec![
            Table::new("users")
                .with_column(text("Email"))
                .with_column(text("name")),
        ]);
        let issues = rule().evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column.as_deref(), Some("Email"));
        assert_eq!(issues[0].severity, Severity::Low);
        assert_eq!(issues[0].category, IssueCategory::Performance);
    }

    #[test]
    fn test_any_index_position_counts() {
        let schema = DatabaseSchema::new(vec![
            Table::new("users")
                .with_column(text("name"))
                .with_column(text("email"))
                .with_index(Index::new("idx_name_email", ["name", "email"])),
        ]);
        assert!(rule().evaluate(&schema).unwrap().is_empty());
    }

    #[test]
    fn test_unique_constraint_counts_as_index() {
        let schema = DatabaseSchema::new(vec![
            Table::new("users")
                .with_column(text("email"))
                .with_constraint(Constraint::unique(["email"])),
        ]);
        assert!(rule().evaluate(&schema).unwrap().is_empty());
    }

    #[test]
    fn test_empty_list_disables_rule() {
        let schema = DatabaseSchema::new(vec![Table::new("users").with_column(text("email"))]);
        let rule = UnindexedLookupColumnRule::default();
        assert!(rule.evaluate(&schema).unwrap().is_empty());
    }
}
