//! # recon-report
//!
//! Reconciles two versions of a student register keyed by a stable identifier
//! and reports every field-level discrepancy, grouped by category, together
//! with derived impairment-expiration and scholarship-eligibility checks.

pub mod aggregate;
pub mod align;
pub mod category;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod derived;
pub mod error;
pub mod job;
pub mod model;
pub mod output;
pub mod pdf;
pub mod positional;
pub mod progress;
pub mod reconcile;
pub mod record;
pub mod report;
pub mod workspace;
mod xlsx;

pub use category::Category;
pub use config::JobConfig;
pub use error::{ReconError, Result};
pub use job::{JobOutcome, ReconciliationJob};
pub use record::{Cell, RecordSet, MISSING_MARKER};
pub use report::ReportIndex;
pub use workspace::ReconWorkspace;
