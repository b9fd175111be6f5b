//! Detection of business-required columns that allow NULL.

use crate::models::{DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError, name_in};

/// Flags nullable columns whose name is on the configured required list.
#[derive(Debug, Clone, Default)]
pub struct RequiredColumnNullabilityRule {
    columns: Vec<String>,
}

impl RequiredColumnNullabilityRule {
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

impl Rule for RequiredColumnNullabilityRule {
    fn name(&self) -> &'static str {
        "required_column_nullability"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let issues = table
            .columns
            .iter()
            .filter(|column| column.is_nullable && name_in(&self.columns, &column.name))
            .map(|column| {
                Issue::new(
                    &table.name,
                    IssueCategory::Nullability,
                    Severity::Medium,
                    format!(
                        "The column '{}' in table '{}' allows NULL values, but it should not.",
                        column.name, table.name
                    ),
                    format!(
                        "Alter the column '{}({})' to NOT NULL to maintain data integrity.",
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
        Column::new(name, DataType::new(ColumnType::Text, "TEXT"))
    }

    #[test]
    fn test_nullable_required_columns_are_flagged() {
        let schema = DatabaseSchema::new(vec![
            Table::new("users")
                .with_column(text("username"))
                .with_column(text("email").not_null())
                .with_column(text("nickname")),
        ]);
        let rule = RequiredColumnNullabilityRule::new(["username", "email"]);
        let issues = rule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column.as_deref(), Some("username"));
        assert_eq!(issues[0].category, IssueCategory::Nullability);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert!(issues[0].recommendation.contains("NOT NULL"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let schema = DatabaseSchema::new(vec![Table::new("orders").with_column(text("Order_Date"))]);
        let rule = RequiredColumnNullabilityRule::new(["order_date"]);
        assert_eq!(rule.evaluate(&schema).unwrap().len(), 1);
    }
}
