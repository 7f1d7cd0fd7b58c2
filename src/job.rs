//! End-to-end reconciliation job

use crate::aggregate::render_aggregate;
use crate::align::KeyAligner;
use crate::config::JobConfig;
use crate::data::DataProcessor;
use crate::error::{ReconError, Result};
use crate::progress::ProgressReporter;
use crate::reconcile::FieldReconciler;
use crate::record::RecordSet;
use crate::report::{ReportIndex, ReportWriter, AGGREGATE_REPORT_KEY, AGGREGATE_REPORT_NAME};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

/// Counts describing one run
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub as_of: NaiveDate,
    pub left_rows: usize,
    pub right_rows: usize,
    pub aligned_keys: usize,
    pub left_only: usize,
    pub right_only: usize,
    /// Entry count per category slug, in category order
    pub entries: IndexMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub reports: ReportIndex,
    pub summary: JobSummary,
}

/// Identifier plus every category column must exist in both sources
pub fn check_required_columns(config: &JobConfig, left: &RecordSet, right: &RecordSet) -> Result<()> {
    for column in config.required_columns() {
        for set in [left, right] {
            if !set.has_column(column) {
                return Err(ReconError::missing_column(column, set.source()));
            }
        }
    }
    Ok(())
}

/// Runs align, reconcile, write and aggregate for one pair of sources
pub struct ReconciliationJob<'c> {
    config: &'c JobConfig,
    today: NaiveDate,
}

impl<'c> ReconciliationJob<'c> {
    pub fn new(config: &'c JobConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// Load both sources and run the job
    pub fn run_files(
        &self,
        left_path: &Path,
        right_path: &Path,
        reports_dir: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<JobOutcome> {
        let processor = DataProcessor::new_with_config(self.config.header_skip_rows)?;
        let left = processor.load_file(left_path)?;
        let right = processor.load_file(right_path)?;
        log::info!(
            "Loaded {} rows from {} and {} rows from {}",
            left.len(),
            left.source(),
            right.len(),
            right.source()
        );
        progress.finish_load(&format!("Loaded {} + {} rows", left.len(), right.len()));

        self.run(&left, &right, reports_dir, progress)
    }

    /// Run the job on loaded sources, writing artifacts into `reports_dir`
    pub fn run(
        &self,
        left: &RecordSet,
        right: &RecordSet,
        reports_dir: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<JobOutcome> {
        check_required_columns(self.config, left, right)?;

        let aligner = KeyAligner::new(left, right, &self.config.id_column);
        let pairs = aligner.pairs();
        log::info!(
            "Aligned {} keys ({} only in {}, {} only in {})",
            pairs.len(),
            aligner.left_only_count(),
            left.source(),
            aligner.right_only_count(),
            right.source()
        );

        let results = FieldReconciler::new(self.config, self.today).reconcile(&pairs);
        let total: usize = results.iter().map(|(_, entries)| entries.len()).sum();
        progress.finish_reconcile(&format!("Found {} differences", total));

        let writer = ReportWriter::new(reports_dir);
        let mut reports = writer.write_all(&results)?;
        progress.update_render("Rendering aggregate...");

        if render_aggregate(reports_dir, &reports, self.config.pdf_font.as_deref())?.is_some() {
            reports.insert(AGGREGATE_REPORT_KEY, AGGREGATE_REPORT_NAME);
        }
        progress.finish_render(&format!("Wrote {} reports", reports.len()));

        let summary = JobSummary {
            as_of: self.today,
            left_rows: left.len(),
            right_rows: right.len(),
            aligned_keys: pairs.len(),
            left_only: aligner.left_only_count(),
            right_only: aligner.right_only_count(),
            entries: results
                .iter()
                .map(|(category, entries)| (category.slug().to_string(), entries.len()))
                .collect(),
        };

        Ok(JobOutcome { reports, summary })
    }
}
