//! Detection of columns whose type differs from the expected one.

use std::collections::BTreeMap;

use crate::models::{ColumnType, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags columns whose semantic type differs from a configured expectation
/// (default `rating` should be FLOAT).
#[derive(Debug, Clone, Default)]
pub struct ExpectedColumnTypeRule {
    /// Keyed by lowercased column name
    expected: BTreeMap<String, ColumnType>,
}

impl ExpectedColumnTypeRule {
    /// Creates the rule from a column name to type map.
    pub fn new(expected: BTreeMap<String, ColumnType>) -> Self {
        Self {
            expected: expected
                .into_iter()
                .map(|(name, kind)| (name.to_lowercase(), kind))
                .collect(),
        }
    }
}

impl Rule for ExpectedColumnTypeRule {
    fn name(&self) -> &'static str {
        "expected_column_type"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let mut issues = Vec::new();
        for column in &table.columns {
            let Some(expected) = self.expected.get(&column.name.to_lowercase()) else {
                continue;
            };
            if column.data_type.kind == *expected {
                continue;
            }
            issues.push(
                Issue::new(
                    &table.name,
                    IssueCategory::DataType,
                    Severity::Low,
                    format!(
                        "The column '{}' in table '{}' is of type '{}', but it should be of type '{}'.",
                        column.name, table.name, column.data_type, expected
                    ),
                    format!(
                        "Change the data type of '{}({})' to '{}' to match the expected type.",
                        table.name, column.name, expected
                    ),
                )
                .with_column(&column.name),
            );
        }
        Ok(issues)
    }
}
