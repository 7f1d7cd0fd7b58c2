//! Per-category discrepancy detection over aligned keys

use crate::align::AlignedPair;
use crate::category::{Category, Rule};
use crate::config::JobConfig;
use crate::derived::{evaluate_eligibility, evaluate_impairment};
use crate::model::{sort_entries, DiffDetail, DiffEntry, Side};
use chrono::NaiveDate;
use rayon::prelude::*;

/// Applies each category's rule to every aligned key
pub struct FieldReconciler<'c> {
    config: &'c JobConfig,
    today: NaiveDate,
}

impl<'c> FieldReconciler<'c> {
    pub fn new(config: &'c JobConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// Entries of every category, in category order. Categories are independent
    /// and are evaluated in parallel.
    pub fn reconcile(&self, pairs: &[AlignedPair<'_>]) -> Vec<(Category, Vec<DiffEntry>)> {
        Category::ALL
            .par_iter()
            .map(|&category| (category, self.reconcile_category(category, pairs)))
            .collect()
    }

    /// Entries of one category, sorted by key
    pub fn reconcile_category(&self, category: Category, pairs: &[AlignedPair<'_>]) -> Vec<DiffEntry> {
        let mut entries: Vec<DiffEntry> = match category.rule() {
            Rule::Mismatch => {
                let column = category.column(self.config);
                pairs
                    .iter()
                    .filter_map(|pair| {
                        let left = pair.left.get(column);
                        let right = pair.right.get(column);
                        if left.strictly_equals(right) {
                            None
                        } else {
                            Some(DiffEntry::new(
                                pair.key,
                                DiffDetail::Mismatch { left: left.clone(), right: right.clone() },
                            ))
                        }
                    })
                    .collect()
            }
            Rule::Impairment => {
                let flag = category.column(self.config);
                let expiry = self.config.columns.impairment_expiry.as_str();
                pairs
                    .iter()
                    .filter_map(|pair| {
                        evaluate_impairment(
                            pair.left.get(flag),
                            pair.right.get(flag),
                            pair.left.get(expiry),
                            pair.right.get(expiry),
                            self.today,
                        )
                        .map(|detail| DiffEntry::new(pair.key, detail))
                    })
                    .collect()
            }
            Rule::Eligibility => {
                let scholarship = self.config.columns.scholarship_type.as_str();
                let performance = self.config.columns.performance.as_str();
                let codes = self.config.flagged_performance_codes.as_slice();
                pairs
                    .iter()
                    .flat_map(|pair| {
                        [(Side::File1, pair.left), (Side::File2, pair.right)]
                            .into_iter()
                            .filter_map(move |(side, record)| {
                                evaluate_eligibility(
                                    side,
                                    record.get(scholarship),
                                    record.get(performance),
                                    codes,
                                )
                                .map(|detail| DiffEntry::new(pair.key, detail))
                            })
                    })
                    .collect()
            }
        };

        sort_entries(&mut entries);
        log::debug!("{}: {} entries", category, entries.len());
        entries
    }
}
