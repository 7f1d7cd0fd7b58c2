//! Discrepancy entries produced by reconciliation

use crate::category::Category;
use crate::record::Cell;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// Which source an entry or value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Side {
    File1,
    File2,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File1 => write!(f, "File1"),
            Self::File2 => write!(f, "File2"),
        }
    }
}

/// Category-specific payload of a discrepancy
#[derive(Debug, Clone)]
pub enum DiffDetail {
    /// Raw values of both sides, verbatim
    Mismatch { left: Cell, right: Cell },
    /// Disagreeing impairment flags with the expiration check of each side
    Impairment {
        left_flag: Cell,
        right_flag: Cell,
        left_date: Option<NaiveDate>,
        right_date: Option<NaiveDate>,
        left_expired: bool,
        right_expired: bool,
    },
    /// One side whose scholarship holder has a flagged performance code
    Eligibility {
        side: Side,
        scholarship: Cell,
        performance: Cell,
    },
}

/// One discrepancy for one aligned key
#[derive(Debug, Clone)]
pub struct DiffEntry {
    pub key: String,
    pub detail: DiffDetail,
}

impl DiffEntry {
    pub fn new(key: impl Into<String>, detail: DiffDetail) -> Self {
        Self { key: key.into(), detail }
    }

    /// `(attribute, value)` pairs in the category's attribute order
    pub fn fields(&self, category: Category) -> Vec<(String, String)> {
        let names = category.attribute_names();
        let values = match &self.detail {
            DiffDetail::Mismatch { left, right } => {
                vec![self.key.clone(), left.to_string(), right.to_string()]
            }
            DiffDetail::Impairment {
                left_flag,
                right_flag,
                left_date,
                right_date,
                left_expired,
                right_expired,
            } => vec![
                self.key.clone(),
                left_flag.to_string(),
                right_flag.to_string(),
                render_date(left_date),
                render_date(right_date),
                yes_no(*left_expired).to_string(),
                yes_no(*right_expired).to_string(),
            ],
            DiffDetail::Eligibility { side, scholarship, performance } => vec![
                self.key.clone(),
                side.to_string(),
                scholarship.to_string(),
                performance.to_string(),
            ],
        };
        names.into_iter().zip(values).collect()
    }

    /// `name: value` pairs joined by `, `
    pub fn render(&self, category: Category) -> String {
        self.fields(category)
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn side_rank(&self) -> Option<Side> {
        match &self.detail {
            DiffDetail::Eligibility { side, .. } => Some(*side),
            _ => None,
        }
    }
}

fn render_date(date: &Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Numeric-aware key order: all-digit keys sort before every other key and
/// compare by value; the rest compare lexically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    match (numeric(a), numeric(b)) {
        (true, true) => {
            let a_trim = a.trim_start_matches('0');
            let b_trim = b.trim_start_matches('0');
            a_trim
                .len()
                .cmp(&b_trim.len())
                .then_with(|| a_trim.cmp(b_trim))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

/// Stable report order: key first, File1 before File2 for one-sided entries
pub fn sort_entries(entries: &mut [DiffEntry]) {
    entries.sort_by(|a, b| {
        compare_keys(&a.key, &b.key).then_with(|| a.side_rank().cmp(&b.side_rank()))
    });
}
