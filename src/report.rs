//! Per-category text artifacts and the index that names them

use crate::category::Category;
use crate::error::Result;
use crate::model::DiffEntry;
use crate::record::MISSING_MARKER;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Index key of the aggregate document
pub const AGGREGATE_REPORT_KEY: &str = "all";

/// File name of the aggregate document
pub const AGGREGATE_REPORT_NAME: &str = "report_all.pdf";

/// Title line plus attribute header line at the top of every artifact
pub const PREAMBLE_LINES: usize = 2;

/// Ordered map from report key to artifact file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportIndex {
    entries: IndexMap<String, String>,
}

impl ReportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, file_name: impl Into<String>) {
        self.entries.insert(key.into(), file_name.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn has_aggregate(&self) -> bool {
        self.contains(AGGREGATE_REPORT_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A data line whose content is semantically empty
pub fn is_marker_line(line: &str) -> bool {
    line.trim().contains(MISSING_MARKER)
}

/// Render an artifact body. `None` when there is nothing to report.
pub fn render_report(title: &str, attribute_names: &[String], lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let mut body = String::new();
    body.push_str(&format!("Changes in {}:\n", title));
    body.push_str(&attribute_names.join(", "));
    body.push('\n');
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }
    Some(body)
}

/// Writes category artifacts into one report directory
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self { reports_dir: reports_dir.into() }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Write `report_<slug>.txt` for a non-empty entry list and return its file name
    pub fn write_category(&self, category: Category, entries: &[DiffEntry]) -> Result<Option<String>> {
        let lines: Vec<String> = entries.iter().map(|e| e.render(category)).collect();
        let body = match render_report(category.title(), &category.attribute_names(), &lines) {
            Some(body) => body,
            None => return Ok(None),
        };

        fs::create_dir_all(&self.reports_dir)?;
        let file_name = category.artifact_name();
        fs::write(self.reports_dir.join(&file_name), body)?;
        log::debug!("Wrote {} ({} lines)", file_name, lines.len());

        Ok(Some(file_name))
    }

    /// Write every non-empty category in the given order, building the index once
    pub fn write_all(&self, results: &[(Category, Vec<DiffEntry>)]) -> Result<ReportIndex> {
        let mut index = ReportIndex::new();
        for (category, entries) in results {
            if let Some(file_name) = self.write_category(*category, entries)? {
                index.insert(category.slug(), file_name);
            }
        }
        Ok(index)
    }
}

/// Data lines of an artifact, preamble excluded
pub fn read_data_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .skip(PREAMBLE_LINES)
        .map(|line| line.to_string())
        .collect())
}
