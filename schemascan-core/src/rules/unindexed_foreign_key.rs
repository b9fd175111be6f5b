//! Detection of foreign key columns without a supporting index.

use crate::models::{ConstraintKind, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags FOREIGN KEY columns that are not the leading column of any index.
///
/// An index that contains the column in a later position does not count,
/// since it cannot serve lookups on that column alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnindexedForeignKeyRule;

impl Rule for UnindexedForeignKeyRule {
    fn name(&self) -> &'static str {
        "unindexed_foreign_key"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let issues = table
            .columns
            .iter()
            .filter(|column| table.is_covered_by(ConstraintKind::ForeignKey, &column.name))
            .filter(|column| !table.has_leading_index(&column.name))
            .map(|column| {
                Issue::new(
                    &table.name,
                    IssueCategory::Performance,
                    Severity::Medium,
                    format!(
                        "The foreign key column '{}' in table '{}' is not indexed.",
                        column.name, table.name
                    ),
                    format!(
                        "Add an index on '{}({})' to speed up joins and cascading deletes.",
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

    fn int(name: &str) -> Column {
        Column::new(name, DataType::new(ColumnType::Integer, "INTEGER"))
    }

    fn orders() -> Table {
        Table::new("orders")
            .with_column(int("id"))
            .with_column(int("customer_id"))
            .with_column(int("product_id"))
            .with_constraint(Constraint::foreign_key(["customer_id"], "customers", ["id"]))
    }

    #[test]
    fn test_foreign_key_without_index_is_flagged() {
        let schema = DatabaseSchema::new(vec![orders()]);
        let issues = UnindexedForeignKeyRule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column.as_deref(), Some("customer_id"));
        assert_eq!(issues[0].category, IssueCategory::Performance);
        assert_eq!(issues[0].severity, Severity::Medium);
    }

    #[test]
    fn test_leading_index_satisfies_rule() {
        let schema = DatabaseSchema::new(vec![
            orders().with_index(Index::new("idx", ["customer_id", "product_id"])),
        ]);
        assert!(UnindexedForeignKeyRule.evaluate(&schema).unwrap().is_empty());
    }

    #[test]
    fn test_non_leading_index_does_not_count() {
        let schema = DatabaseSchema::new(vec![
            orders().with_index(Index::new("idx", ["product_id", "customer_id"])),
        ]);
        assert_eq!(UnindexedForeignKeyRule.evaluate(&schema).unwrap().len(), 1);
    }

    #[test]
    fn test_composite_foreign_key_reports_each_column() {
        let schema = DatabaseSchema::new(vec![
            Table::new("lines")
                .with_column(int("order_id"))
                .with_column(int("line_no"))
                .with_constraint(Constraint::foreign_key(
                    ["order_id", "line_no"],
                    "order_lines",
                    ["order_id", "line_no"],
                ))
                .with_index(Index::new("idx", ["order_id", "line_no"])),
        ]);
        let issues = UnindexedForeignKeyRule.evaluate(&schema).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].column.as_deref(), Some("line_no"));
    }
}
