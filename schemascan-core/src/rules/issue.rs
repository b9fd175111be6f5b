//! Issue records produced by the rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Issue severity.
///
/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Worth a look; also used for rule failure diagnostics
    Low,
    /// Likely to cause integrity or performance problems
    Medium,
    /// Breaks a basic relational guarantee
    High,
}

impl Severity {
    /// Stable upper-case label used by the reporters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class of schema flaw an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// Missing or implicit keys
    Normalization,
    /// Missing indexes
    Performance,
    /// Unsuitable column types
    DataType,
    /// Columns that should be NOT NULL
    Nullability,
}

impl IssueCategory {
    /// Stable upper-case label used by the reporters.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Normalization => "NORMALIZATION",
            IssueCategory::Performance => "PERFORMANCE",
            IssueCategory::DataType => "DATA_TYPE",
            IssueCategory::Nullability => "NULLABILITY",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
///
/// Issues carry no identity; two issues with the same fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Table the finding is about
    pub table: String,
    /// `None` for table-level findings
    pub column: Option<String>,
    pub category: IssueCategory,
    /// What is wrong
    pub description: String,
    /// How to fix it
    pub recommendation: String,
    pub severity: Severity,
}

impl Issue {
    /// Creates a table-level issue.
    pub fn new(
        table: impl Into<String>,
        category: IssueCategory,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            column: None,
            category,
            description: description.into(),
            recommendation: recommendation.into(),
            severity,
        }
    }

    /// Builder method to attach the issue to a column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Issue counts for the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Number of issues
    pub total: usize,
    /// HIGH severity count
    pub high: usize,
    /// MEDIUM severity count
    pub medium: usize,
    /// LOW severity count
    pub low: usize,
    /// Counts keyed by category label
    pub by_category: BTreeMap<String, usize>,
}

impl IssueSummary {
    /// Counts issues by severity and category.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        for issue in issues {
            match issue.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            *summary
                .by_category
                .entry(issue.category.as_str().to_string())
                .or_insert(0) += 1;
        }
        summary
    }
}

impl std::fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} issue(s): {} high, {} medium, {} low",
            self.total, self.high, self.medium, self.low
        )
    }
}
