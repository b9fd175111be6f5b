//! Reporters rendering a finished issue list.
//!
//! Reporters never change the issue list; a failure here is reported after
//! the findings are already computed.

pub mod console;
pub mod csv;

use std::path::PathBuf;
use thiserror::Error;

pub use console::render_console;
pub use csv::write_csv;

/// Errors produced while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem or stream failure
    #[error("Failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding failure
    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for reporter operations.
pub type Result<T> = std::result::Result<T, ReportError>;
