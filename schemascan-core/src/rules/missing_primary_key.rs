//! Detection of tables without a primary key.

use crate::models::{ConstraintKind, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags every table with no PRIMARY KEY constraint. Table-level finding.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingPrimaryKeyRule;

impl Rule for MissingPrimaryKeyRule {
    fn name(&self) -> &'static str {
        "missing_primary_key"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        if table.constraints_of(ConstraintKind::PrimaryKey).next().is_some() {
            return Ok(Vec::new());
        }
        Ok(vec![Issue::new(
            &table.name,
            IssueCategory::Normalization,
            Severity::High,
            format!("The table '{}' has no primary key.", table.name),
            format!(
                "Add a PRIMARY KEY constraint to '{}' so that every row can be identified and referenced.",
                table.name
            ),
        )])
    }
}
