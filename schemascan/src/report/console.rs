//! Plain-text report for the terminal.

use super::{ReportError, Result};
use schemascan_core::Issue;
use std::io::Write;

/// Shown in the column line of table-level findings.
const NO_COLUMN: &str = "N/A";

/// Writes the labelled block report for `issues` to `out`.
///
/// ```text
/// Schema Issues Detected:
/// Table: orders
/// Column: user_id
/// Issue Type: NORMALIZATION
/// Severity: HIGH
/// Issue: ...
/// Recommendation: ...
///
/// ```
///
/// # Errors
/// Returns error if writing to `out` fails
pub fn render_console<W: Write>(issues: &[Issue], out: &mut W) -> Result<()> {
    render(issues, out).map_err(|e| ReportError::io("<stdout>", e))
}

fn render<W: Write>(issues: &[Issue], out: &mut W) -> std::io::Result<()> {
    if issues.is_empty() {
        writeln!(out, "No schema issues detected!")?;
        return out.flush();
    }

    writeln!(out, "Schema Issues Detected:")?;
    for issue in issues {
        writeln!(out, "Table: {}", issue.table)?;
        writeln!(out, "Column: {}", issue.column.as_deref().unwrap_or(NO_COLUMN))?;
        writeln!(out, "Issue Type: {}", issue.category)?;
        writeln!(out, "Severity: {}", issue.severity)?;
        writeln!(out, "Issue: {}", issue.description)?;
        writeln!(out, "Recommendation: {}", issue.recommendation)?;
        writeln!(out)?;
    }
    out.flush()
}
