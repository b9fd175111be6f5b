//! Rule engine facade.
//!
//! Applies an ordered rule set to a schema and collects the findings.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::models::{DatabaseSchema, Table};

use super::config::HeuristicConfig;
use super::expected_column_type::ExpectedColumnTypeRule;
use super::implicit_foreign_key::ImplicitForeignKeyRule;
use super::issue::{Issue, IssueCategory, Severity};
use super::missing_primary_key::MissingPrimaryKeyRule;
use super::monetary_precision::MonetaryPrecisionRule;
use super::nullable_critical_column::NullableCriticalColumnRule;
use super::required_column_nullability::RequiredColumnNullabilityRule;
use super::unindexed_foreign_key::UnindexedForeignKeyRule;
use super::unindexed_lookup_column::UnindexedLookupColumnRule;
use super::{Rule, RuleError};

/// Ordered rule set applied to a schema.
///
/// Results are ordered by rule registration order, then by table order in
/// the schema, then by declared column order. Nothing is deduplicated: a
/// column can receive findings from several rules.
///
/// # Example
///
/// ```rust
/// use schemascan_core::models::*;
/// use schemascan_core::rules::{HeuristicConfig, RuleEngine};
///
/// let engine = RuleEngine::with_default_rules(&HeuristicConfig::default());
/// let schema = DatabaseSchema::new(vec![Table::new("events")]);
///
/// let issues = engine.run(&schema);
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].table, "events");
/// ```
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl RuleEngine {
    /// Creates an engine with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the built-in rules in their default order.
    pub fn with_default_rules(config: &HeuristicConfig) -> Self {
        let mut engine = Self::new();
        engine
            .register(ImplicitForeignKeyRule::new(config.foreign_key_suffix.clone()))
            .register(MonetaryPrecisionRule::new(config.monetary_keywords.clone()))
            .register(UnindexedForeignKeyRule)
            .register(NullableCriticalColumnRule)
            .register(MissingPrimaryKeyRule)
            .register(UnindexedLookupColumnRule::new(config.lookup_columns.clone()))
            .register(ExpectedColumnTypeRule::new(config.expected_types.clone()))
            .register(RequiredColumnNullabilityRule::new(
                config.required_columns.clone(),
            ));
        engine
    }

    /// Appends a rule; it runs after every rule registered before it.
    pub fn register<R>(&mut self, rule: R) -> &mut Self
    where
        R: Rule + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Builder form of [`Self::register`].
    pub fn with_rule<R>(mut self, rule: R) -> Self
    where
        R: Rule + 'static,
    {
        self.register(rule);
        self
    }

    /// Names of the registered rules in execution order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every registered rule to the schema.
    pub fn run(&self, schema: &DatabaseSchema) -> Vec<Issue> {
        run(schema, &self.rules)
    }
}

/// Applies `rules` in order to every table of `schema`.
///
/// A rule that fails or panics on one table yields a LOW severity
/// NORMALIZATION diagnostic issue for that table; evaluation continues with
/// the next table and the next rule.
pub fn run(schema: &DatabaseSchema, rules: &[Box<dyn Rule>]) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in rules {
        let before = issues.len();
        for table in &schema.tables {
            match check_isolated(rule.as_ref(), table, schema) {
                Ok(found) => issues.extend(found),
                Err(e) => {
                    tracing::warn!(
                        "Rule '{}' failed on table '{}': {}",
                        rule.name(),
                        table.name,
                        e
                    );
                    issues.push(rule_failure_issue(rule.name(), table, &e));
                }
            }
        }
        tracing::debug!(
            "Rule '{}' produced {} issue(s) across {} table(s)",
            rule.name(),
            issues.len().saturating_sub(before),
            schema.tables.len()
        );
    }

    issues
}

fn check_isolated(
    rule: &dyn Rule,
    table: &Table,
    schema: &DatabaseSchema,
) -> Result<Vec<Issue>, RuleError> {
    // The schema is only read, so a panic cannot leave it half-updated.
    catch_unwind(AssertUnwindSafe(|| rule.check_table(table, schema)))
        .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn rule_failure_issue(rule: &str, table: &Table, error: &RuleError) -> Issue {
    Issue::new(
        &table.name,
        IssueCategory::Normalization,
        Severity::Low,
        format!(
            "Rule '{}' could not evaluate table '{}': {}",
            rule, table.name, error
        ),
        format!(
            "Review the collected metadata for '{}' and rerun with -v for details; other rules and tables were still checked.",
            table.name
        ),
    )
}
