//! CSV export of findings.

use super::{ReportError, Result};
use schemascan_core::Issue;
use std::fs::{self, File};
use std::path::Path;

/// Header row of the export.
pub const CSV_HEADER: [&str; 5] = ["table", "column", "issue_type", "issue", "recommendation"];

/// Writes one row per issue to `path`, creating parent directories as needed.
///
/// The header is always written, so zero issues produce a header-only file.
/// Table-level issues leave the column cell empty.
///
/// # Errors
/// Returns error if the directory or file cannot be created or written
pub fn write_csv(issues: &[Issue], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut writer = ::csv::Writer::from_writer(file);

    writer.write_record(CSV_HEADER)?;
    for issue in issues {
        writer.write_record([
            issue.table.as_str(),
            issue.column.as_deref().unwrap_or_default(),
            issue.category.as_str(),
            issue.description.as_str(),
            issue.recommendation.as_str(),
        ])?;
    }
    writer.flush().map_err(|e| ReportError::io(path, e))?;

    tracing::debug!("Wrote {} row(s) to {}", issues.len(), path.display());
    Ok(())
}
