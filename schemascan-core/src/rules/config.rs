//! Heuristic configuration for the built-in rules.
//!
//! The name patterns the rules match against are data, not literals, so a
//! deployment can tune them from a JSON file without touching rule code.
//! All name comparisons are case-insensitive.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ColumnType;

/// Name patterns and lists driving the built-in rules.
///
/// Missing fields in a JSON document fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Column name suffix marking an implicit foreign key
    pub foreign_key_suffix: String,
    /// Substrings marking a monetary column
    pub monetary_keywords: Vec<String>,
    /// Columns expected to be indexed because they are looked up by value
    pub lookup_columns: Vec<String>,
    /// Expected semantic type per column name
    pub expected_types: BTreeMap<String, ColumnType>,
    /// Columns that business rules require to be NOT NULL
    pub required_columns: Vec<String>,
}

/// Validation errors for heuristic configuration.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// The foreign key suffix is empty
    #[error("foreign_key_suffix must not be empty")]
    EmptySuffix,
    /// A name list holds an empty entry
    #[error("{list} contains an empty pattern")]
    EmptyPattern { list: &'static str },
    /// The file is not valid heuristics JSON
    #[error("invalid heuristic configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            foreign_key_suffix: "_id".to_string(),
            monetary_keywords: ["price", "amount", "cost", "salary"]
                .into_iter()
                .map(String::from)
                .collect(),
            lookup_columns: vec!["email".to_string()],
            expected_types: BTreeMap::from([("rating".to_string(), ColumnType::Float)]),
            required_columns: [
                "email",
                "price",
                "total_amount",
                "order_date",
                "rating",
                "username",
                "product_name",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl HeuristicConfig {
    /// Creates a new heuristic config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the implicit foreign key suffix.
    pub fn with_foreign_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.foreign_key_suffix = suffix.into();
        self
    }

    /// Builder method to replace the monetary keywords.
    pub fn with_monetary_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monetary_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to replace the lookup columns.
    pub fn with_lookup_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lookup_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to add or replace one expected column type.
    pub fn with_expected_type(mut self, column: impl Into<String>, kind: ColumnType) -> Self {
        self.expected_types.insert(column.into(), kind);
        self
    }

    /// Builder method to replace the required columns.
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigValidationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON document from `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read and a configuration
    /// error if its content is invalid.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            crate::error::SchemaScanError::io(
                format!("Failed to read heuristics file '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json).map_err(|e| {
            crate::error::SchemaScanError::configuration(format!(
                "{} ({})",
                e,
                path.display()
            ))
        })
    }

    /// Validates the configuration.
    ///
    /// Returns an error if the suffix or any pattern is empty. Empty lists
    /// are allowed and disable the corresponding rule.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.foreign_key_suffix.trim().is_empty() {
            return Err(ConfigValidationError::EmptySuffix);
        }
        let lists: [(&'static str, &[String]); 3] = [
            ("monetary_keywords", &self.monetary_keywords),
            ("lookup_columns", &self.lookup_columns),
            ("required_columns", &self.required_columns),
        ];
        for (list, patterns) in lists {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyPattern { list });
            }
        }
        if self.expected_types.keys().any(|k| k.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyPattern {
                list: "expected_types",
            });
        }
        Ok(())
    }
}
