//! Source loading with header preamble detection
//!
//! Registers arrive either with the real header in the first row or with a
//! fixed-size title block above it. The loader parses the first row, and when
//! most of its labels are placeholders it re-reads the source with the
//! preamble skipped.

use crate::error::{ReconError, Result};
use crate::record::{Cell, RecordSet};
use crate::xlsx;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;

/// Rows occupied by the title block when one is present
pub const DEFAULT_HEADER_SKIP_ROWS: usize = 5;

/// Source family, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Tsv,
    Excel,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension().and_then(|s| s.to_str())?.to_lowercase();
        match extension.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Loads tabular sources into record sets
pub struct DataProcessor {
    connection: Connection,
    header_skip_rows: usize,
}

impl DataProcessor {
    /// Create a loader with the default preamble size
    pub fn new() -> Result<Self> {
        Self::new_with_config(DEFAULT_HEADER_SKIP_ROWS)
    }

    /// Create a loader with a custom preamble size
    pub fn new_with_config(header_skip_rows: usize) -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute("SET enable_progress_bar=false", [])?;

        Ok(Self { connection, header_skip_rows })
    }

    /// Load a source, detecting whether the header preamble must be skipped
    pub fn load_file(&self, file_path: &Path) -> Result<RecordSet> {
        if !file_path.is_file() {
            return Err(ReconError::load(
                file_path.display().to_string(),
                "file not found",
            ));
        }

        let format = SourceFormat::from_path(file_path).ok_or_else(|| {
            ReconError::invalid_input(format!(
                "Unsupported source format: {}",
                file_path.display()
            ))
        })?;

        log::debug!("Loading {} as {:?}", file_path.display(), format);

        match format {
            SourceFormat::Excel => xlsx::load_workbook(file_path, self.header_skip_rows),
            SourceFormat::Csv | SourceFormat::Tsv => self.load_delimited(file_path, format),
        }
    }

    fn load_delimited(&self, file_path: &Path, format: SourceFormat) -> Result<RecordSet> {
        // Default parse first, first row as header
        self.create_view(file_path, format, 0, true)?;
        let first_labels = self.column_names(file_path)?;

        let skip = if needs_header_skip(&first_labels) {
            log::info!(
                "{}: header preamble detected, skipping {} rows",
                file_path.display(),
                self.header_skip_rows
            );
            self.header_skip_rows
        } else {
            0
        };

        self.create_view(file_path, format, skip, false)?;
        let labels = self.column_names(file_path)?;
        let rows = self.extract_rows(file_path, labels.len())?;

        log::debug!(
            "{}: {} rows, {} columns",
            file_path.display(),
            rows.len(),
            labels.len()
        );

        Ok(RecordSet::new(file_path.display().to_string(), labels, rows))
    }

    fn create_view(
        &self,
        file_path: &Path,
        format: SourceFormat,
        skip: usize,
        all_varchar: bool,
    ) -> Result<()> {
        let path_str = file_path.to_string_lossy().replace('\'', "''");
        let delimiter = if format == SourceFormat::Tsv { ", delim = '\t'" } else { "" };

        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW data_view AS SELECT * FROM read_csv('{}', header = true, skip = {}, null_padding = true, all_varchar = {}{})",
            path_str, skip, all_varchar, delimiter
        );

        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| convert_duckdb_error(e, file_path))?;
        Ok(())
    }

    /// Column labels of the current view, in source order
    fn column_names(&self, file_path: &Path) -> Result<Vec<String>> {
        Ok(self
            .describe(file_path)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// Column labels and DuckDB types of the current view
    fn describe(&self, file_path: &Path) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .connection
            .prepare("DESCRIBE data_view")
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let mut schema = Vec::new();
        for row in rows {
            schema.push(row.map_err(|e| convert_duckdb_error(e, file_path))?);
        }
        Ok(schema)
    }

    fn extract_rows(&self, file_path: &Path, column_count: usize) -> Result<Vec<Vec<Cell>>> {
        if column_count == 0 {
            return Ok(Vec::new());
        }

        let select_list = self
            .describe(file_path)?
            .iter()
            .map(|(name, column_type)| select_expr(name, column_type))
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {} FROM data_view", select_list))
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let rows = stmt
            .query_map([], |row| {
                let mut cells = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    cells.push(value_to_cell(row.get_ref(i)?));
                }
                Ok(cells)
            })
            .map_err(|e| convert_duckdb_error(e, file_path))?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|e| convert_duckdb_error(e, file_path))?);
        }
        Ok(data)
    }

    /// Check if file format is supported
    pub fn is_supported_format(file_path: &Path) -> bool {
        SourceFormat::from_path(file_path).is_some()
    }
}

/// True for labels the parser invented because the source had no header text
pub fn is_placeholder_label(label: &str) -> bool {
    let label = label.trim();
    if label.is_empty() || label.starts_with("Unnamed") {
        return true;
    }
    match label.strip_prefix("column") {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// More than half of the first-row labels are placeholders
pub fn needs_header_skip(labels: &[String]) -> bool {
    let placeholders = labels.iter().filter(|l| is_placeholder_label(l)).count();
    placeholders * 2 > labels.len()
}

/// Types read back as typed cells; any other column is cast to text by DuckDB
fn is_native_type(column_type: &str) -> bool {
    let column_type = column_type.trim().to_uppercase();
    column_type.starts_with("DECIMAL")
        || matches!(
            column_type.as_str(),
            "BOOLEAN"
                | "TINYINT"
                | "SMALLINT"
                | "INTEGER"
                | "BIGINT"
                | "HUGEINT"
                | "UTINYINT"
                | "USMALLINT"
                | "UINTEGER"
                | "UBIGINT"
                | "FLOAT"
                | "DOUBLE"
                | "VARCHAR"
                | "DATE"
                | "TIMESTAMP"
        )
}

fn select_expr(name: &str, column_type: &str) -> String {
    let quoted = format!("\"{}\"", name.replace('"', "\"\""));
    if is_native_type(column_type) {
        quoted
    } else {
        format!("CAST({} AS VARCHAR) AS {}", quoted, quoted)
    }
}

fn value_to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Missing,
        ValueRef::Boolean(b) => Cell::Text(b.to_string()),
        ValueRef::TinyInt(i) => Cell::Number(i as f64),
        ValueRef::SmallInt(i) => Cell::Number(i as f64),
        ValueRef::Int(i) => Cell::Number(i as f64),
        ValueRef::BigInt(i) => Cell::Number(i as f64),
        ValueRef::HugeInt(i) => Cell::Number(i as f64),
        ValueRef::UTinyInt(i) => Cell::Number(i as f64),
        ValueRef::USmallInt(i) => Cell::Number(i as f64),
        ValueRef::UInt(i) => Cell::Number(i as f64),
        ValueRef::UBigInt(i) => Cell::Number(i as f64),
        ValueRef::Float(f) => Cell::Number(f as f64),
        ValueRef::Double(f) => Cell::Number(f),
        ValueRef::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>().map(Cell::Number).unwrap_or_else(|_| Cell::text(text))
        }
        ValueRef::Text(s) | ValueRef::Blob(s) => Cell::text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Date32(days) => epoch_date(i64::from(days) * 86_400),
        ValueRef::Timestamp(unit, v) => epoch_date(to_nanos(unit, v).div_euclid(1_000_000_000)),
        ValueRef::Time64(unit, v) => {
            let nanos = to_nanos(unit, v);
            let time = u32::try_from(nanos.div_euclid(1_000_000_000)).ok().and_then(|secs| {
                NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos.rem_euclid(1_000_000_000) as u32)
            });
            match time {
                Some(time) => Cell::Text(time.to_string()),
                None => Cell::Text(format!("{}ns", nanos)),
            }
        }
        ValueRef::Interval { months, days, nanos } => {
            Cell::Text(format!("{} months {} days {} ns", months, days, nanos))
        }
        other => Cell::text(format!("{:?}", other.to_owned())),
    }
}

fn to_nanos(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000_000),
        TimeUnit::Microsecond => value.saturating_mul(1_000),
        TimeUnit::Nanosecond => value,
    }
}

fn epoch_date(seconds: i64) -> Cell {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| Cell::Date(dt.date_naive()))
        .unwrap_or(Cell::Missing)
}

/// Excel serial day number (1900 system) to a calendar date
pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

/// Map DuckDB failures onto a load error naming the source
fn convert_duckdb_error(error: duckdb::Error, file_path: &Path) -> ReconError {
    let error_msg = error.to_string();
    let source = file_path.display().to_string();

    if error_msg.contains("CSV Error")
        || error_msg.contains("Could not convert")
        || error_msg.contains("Invalid CSV")
        || error_msg.contains("Unterminated quoted field")
    {
        ReconError::load(source, format!("malformed delimited file: {}", error_msg))
    } else if error_msg.contains("No files found") || error_msg.contains("does not exist") {
        ReconError::load(source, "file not found")
    } else if error_msg.contains("Permission denied") {
        ReconError::load(source, "permission denied")
    } else if error_msg.contains("UTF-8") || error_msg.contains("encoding") {
        ReconError::load(source, format!("encoding error: {}", error_msg))
    } else {
        ReconError::load(source, error_msg)
    }
}
