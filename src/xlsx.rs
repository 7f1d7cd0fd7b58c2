//! Excel workbook loading (first worksheet) via calamine

use crate::data::{excel_serial_to_date, needs_header_skip};
use crate::error::{ReconError, Result};
use crate::record::{Cell, RecordSet};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use std::path::Path;

/// Load the first worksheet, applying the same preamble heuristic as delimited sources
pub fn load_workbook(path: &Path, header_skip_rows: usize) -> Result<RecordSet> {
    let source = path.display().to_string();

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReconError::load(&source, format!("failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReconError::load(&source, "workbook contains no sheets"))?
        .map_err(|e| ReconError::load(&source, format!("failed to read first sheet: {}", e)))?;

    let grid = absolute_grid(&range);

    let header_row = match grid.first() {
        Some(first) if needs_header_skip(&header_labels(first)) => {
            log::info!("{}: header preamble detected, skipping {} rows", source, header_skip_rows);
            header_skip_rows
        }
        _ => 0,
    };

    let labels = grid.get(header_row).map(|row| header_labels(row)).unwrap_or_default();
    let rows = grid
        .iter()
        .skip(header_row + 1)
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    Ok(RecordSet::new(source, labels, rows))
}

/// Rows addressed from A1, so row offsets match what a spreadsheet user sees
fn absolute_grid(range: &Range<Data>) -> Vec<Vec<Data>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|r| {
            (0..=end_col)
                .map(|c| range.get_value((r, c)).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect()
}

/// Header labels; blank cells get `columnN` placeholders
fn header_labels(row: &[Data]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = match cell {
                Data::Empty => String::new(),
                Data::Float(n) if n.fract() == 0.0 => format!("{}", *n as i64),
                other => other.to_string().trim().to_string(),
            };
            if label.is_empty() {
                format!("column{}", i)
            } else {
                label
            }
        })
        .collect()
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Missing),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::text(s.clone())),
        Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}
