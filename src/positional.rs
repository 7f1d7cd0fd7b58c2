//! Row-by-row comparison of two column selections, without key alignment

use crate::error::{ReconError, Result};
use crate::record::RecordSet;
use std::fs;
use std::path::Path;

/// File name of the positional comparison artifact
pub const POSITIONAL_REPORT_NAME: &str = "report.txt";

/// Compare `columns1` of `left` against `columns2` of `right`, pairing columns
/// by position and rows by index. Extra columns in the longer selection and
/// extra rows in the longer source are ignored.
///
/// Returns `None` when no row differs.
pub fn compare_columns(
    left: &RecordSet,
    right: &RecordSet,
    columns1: &[String],
    columns2: &[String],
) -> Result<Option<Vec<String>>> {
    if columns1.is_empty() || columns2.is_empty() {
        return Err(ReconError::invalid_input(
            "Both column selections must name at least one column",
        ));
    }
    for column in columns1 {
        if !left.has_column(column) {
            return Err(ReconError::missing_column(column, left.source()));
        }
    }
    for column in columns2 {
        if !right.has_column(column) {
            return Err(ReconError::missing_column(column, right.source()));
        }
    }

    let rows = left.len().min(right.len());
    log::debug!(
        "Positional comparison over {} rows ({} vs {})",
        rows,
        left.len(),
        right.len()
    );

    let mut lines = Vec::new();
    for i in 0..rows {
        let (a, b) = match (left.record(i), right.record(i)) {
            (Some(a), Some(b)) => (a, b),
            _ => break,
        };

        let notes: Vec<String> = columns1
            .iter()
            .zip(columns2)
            .filter_map(|(col_a, col_b)| {
                let value_a = a.get(col_a).to_string();
                let value_b = b.get(col_b).to_string();
                (value_a != value_b).then(|| format!("{}: {} -> {}", col_a, value_a, value_b))
            })
            .collect();

        if !notes.is_empty() {
            lines.push(format!("Row {}: {}", i + 1, notes.join("; ")));
        }
    }

    Ok(if lines.is_empty() { None } else { Some(lines) })
}

/// Write the comparison lines as `report.txt` in `reports_dir`
pub fn write_positional_report(reports_dir: &Path, lines: &[String]) -> Result<std::path::PathBuf> {
    fs::create_dir_all(reports_dir)?;
    let path = reports_dir.join(POSITIONAL_REPORT_NAME);
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(&path, body)?;
    Ok(path)
}
