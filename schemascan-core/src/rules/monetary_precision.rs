//! Detection of monetary columns stored with an imprecise type.

use crate::models::{ColumnType, DatabaseSchema, Table};

use super::issue::{Issue, IssueCategory, Severity};
use super::{Rule, RuleError};

/// Flags columns with a monetary name whose type is not DECIMAL/NUMERIC.
///
/// Any DECIMAL is accepted regardless of its declared precision and scale.
#[derive(Debug, Clone)]
pub struct MonetaryPrecisionRule {
    keywords: Vec<String>,
}

impl Default for MonetaryPrecisionRule {
    fn default() -> Self {
        Self::new(["price", "amount", "cost", "salary"])
    }
}

impl MonetaryPrecisionRule {
    /// Creates the rule with the given name keywords (matched as substrings).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    fn is_monetary(&self, column: &str) -> bool {
        let name = column.to_lowercase();
        self.keywords.iter().any(|k| name.contains(k.as_str()))
    }
}

impl Rule for MonetaryPrecisionRule {
    fn name(&self) -> &'static str {
        "monetary_precision"
    }

    fn check_table(
        &self,
        table: &Table,
        _schema: &DatabaseSchema,
    ) -> Result<Vec<Issue>, RuleError> {
        let issues = table
            .columns
            .iter()
            .filter(|column| column.data_type.kind != ColumnType::Decimal)
            .filter(|column| self.is_monetary(&column.name))
            .map(|column| {
                Issue::new(
                    &table.name,
                    IssueCategory::DataType,
                    Severity::Medium,
                    format!(
                        "The column '{}' in table '{}' is storing monetary values but is of type '{}' instead of DECIMAL or NUMERIC.",
                        column.name, table.name, column.data_type
                    ),
                    format!(
                        "Change the data type of '{}({})' to DECIMAL or NUMERIC with explicit precision and scale, e.g. DECIMAL(10, 2).",
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

    fn table_with(column: Column) -> DatabaseSchema {
        DatabaseSchema::new(vec![Table::new("products").with_column(column)])
    }

    fn check(schema: &DatabaseSchema) -> Vec<Issue> {
        MonetaryPrecisionRule::default().evaluate(schema).unwrap()
    }

    #[test]
    fn test_varchar_price_is_flagged() {
        let schema = table_with(Column::new(
            "price",
            DataType::new(ColumnType::Text, "VARCHAR(20)"),
        ));
        let issues = check(&schema);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, IssueCategory::DataType);
        assert_eq!(issues[0].severity, Severity::Medium);
        assert!(issues[0].description.contains("VARCHAR(20)"));
    }

    #[test]
    fn test_decimal_of_any_scale_passes() {
        assert!(check(&table_with(Column::new("price", DataType::decimal(10, 2)))).is_empty());
        assert!(check(&table_with(Column::new("price", DataType::decimal(18, 0)))).is_empty());
        assert!(
            check(&table_with(Column::new(
                "price",
                DataType::new(ColumnType::Decimal, "NUMERIC")
            )))
            .is_empty()
        );
    }

    #[test]
    fn test_keywords_match_substrings_case_insensitively() {
        let schema = DatabaseSchema::new(vec![
            Table::new("payroll")
                .with_column(Column::new(
                    "BaseSalary",
                    DataType::new(ColumnType::Float, "REAL"),
                ))
                .with_column(Column::new(
                    "total_amount",
                    DataType::new(ColumnType::Integer, "INTEGER"),
                ))
                .with_column(Column::new(
                    "shipping_cost",
                    DataType::new(ColumnType::Float, "FLOAT"),
                ))
                .with_column(Column::new(
                    "name",
                    DataType::new(ColumnType::Text, "TEXT"),
                )),
        ]);
        let columns: Vec<String> = check(&schema)
            .into_iter()
            .filter_map(|i| i.column)
            .collect();
        assert_eq!(columns, vec!["BaseSalary", "total_amount", "shipping_cost"]);
    }

    #[test]
    fn test_empty_keywords_disable_rule() {
        let schema = table_with(Column::new(
            "price",
            DataType::new(ColumnType::Text, "TEXT"),
        ));
        let rule = MonetaryPrecisionRule::new(Vec::<String>::new());
        assert!(rule.evaluate(&schema).unwrap().is_empty());
    }
}
