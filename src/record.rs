//! Typed tabular model shared by loading, alignment and reporting

use chrono::NaiveDate;
use indexmap::IndexSet;
use std::fmt;

/// Token rendered in place of a missing cell. Report lines containing it are
/// considered semantically empty by the aggregate view.
pub const MISSING_MARKER: &str = "<missing>";

/// A single raw cell value
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

static MISSING: Cell = Cell::Missing;

impl Cell {
    /// Build a text cell, normalizing empty strings to `Missing`
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Strict equality used by the comparison rules.
    ///
    /// Values must have the same variant and the same content; `Missing` is
    /// never equal to anything, including another `Missing`.
    pub fn strictly_equals(&self, other: &Cell) -> bool {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }

    /// Identifier form of the cell: numbers lose a zero fraction, text is trimmed
    pub fn as_key(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            other => Some(other.to_string()),
        }
    }

    /// Interpret the cell as an integer code (numbers with no fraction or integer text)
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(*n as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Missing => write!(f, "{}", MISSING_MARKER),
        }
    }
}

/// All rows of one source plus its ordered column schema
#[derive(Debug, Clone)]
pub struct RecordSet {
    source: String,
    columns: IndexSet<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordSet {
    /// Build a record set. Duplicate labels are suffixed `_1`, `_2`, ... in order
    /// of appearance and short rows are padded with `Missing`.
    pub fn new(source: impl Into<String>, labels: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns = IndexSet::with_capacity(labels.len());
        for label in labels {
            if columns.contains(&label) {
                let mut n = 1;
                while columns.contains(&format!("{}_{}", label, n)) {
                    n += 1;
                }
                columns.insert(format!("{}_{}", label, n));
            } else {
                columns.insert(label);
            }
        }

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();

        Self { source: source.into(), columns, rows }
    }

    /// Label used in error messages (usually the file path)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|cells| Record { set: self, cells })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record { set: self, cells })
    }
}

/// Read-only view of one row, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    set: &'a RecordSet,
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    /// Cell under `column`; unknown columns read as `Missing`
    pub fn get(&self, column: &str) -> &'a Cell {
        self.set
            .columns
            .get_index_of(column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&MISSING)
    }

    /// Iterate `(column, cell)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Cell)> {
        self.set.columns.iter().map(|c| c.as_str()).zip(self.cells.iter())
    }
}
