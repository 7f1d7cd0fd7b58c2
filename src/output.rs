//! Output formatting utilities

use crate::error::Result;
use crate::job::JobOutcome;
use crate::report::ReportIndex;
use serde::Serialize;
use std::path::Path;

/// Column names of one loaded source
#[derive(Debug, Clone, Serialize)]
pub struct SourceColumns {
    pub slot: String,
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Pretty printer for recon-report output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the columns of both slots
    pub fn print_columns(listing: &[SourceColumns]) {
        for source in listing {
            println!("📄 {} ({}, {} rows)", source.slot, source.source, source.rows);
            if source.columns.is_empty() {
                println!("└─ (no columns)");
                continue;
            }
            for (i, column) in source.columns.iter().enumerate() {
                let prefix = if i == source.columns.len() - 1 { "└─" } else { "├─" };
                println!("{} {}", prefix, column);
            }
        }
    }

    /// Print the outcome of a reconciliation job
    pub fn print_job_outcome(outcome: &JobOutcome, reports_dir: &Path, quiet: bool) {
        if quiet {
            // Machine-readable output
            for (key, file_name) in outcome.reports.iter() {
                println!("{}={}", key, file_name);
            }
            return;
        }

        let summary = &outcome.summary;
        println!("📊 Reconciliation as of {}", summary.as_of);
        println!("├─ Rows: {} / {}", summary.left_rows, summary.right_rows);
        println!(
            "├─ Aligned keys: {} ({} only in file1, {} only in file2)",
            summary.aligned_keys, summary.left_only, summary.right_only
        );

        for (slug, count) in &summary.entries {
            let marker = if *count > 0 { "❌" } else { "✅" };
            println!("│  {} {}: {}", marker, slug, count);
        }

        Self::print_report_index(&outcome.reports, reports_dir);
    }

    pub fn print_report_index(index: &ReportIndex, reports_dir: &Path) {
        if index.is_empty() {
            println!("└─ No differences found.");
            return;
        }

        println!("└─ Reports in {}:", reports_dir.display());
        for (i, (key, file_name)) in index.iter().enumerate() {
            let prefix = if i == index.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {}: {}", prefix, key, file_name);
        }
    }

    /// Print the outcome of a positional comparison
    pub fn print_positional_result(path: Option<&Path>, differing_rows: usize) {
        match path {
            Some(path) => {
                println!("🔍 {} rows differ", differing_rows);
                println!("└─ Report: {}", path.display());
            }
            None => println!("✅ No differences found."),
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format<T: Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}
