//! Command-line interface for recon-report

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recon-report")]
#[command(about = "Reconcile two versions of a student register and report every discrepancy")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override workspace location
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize recon workspace
    Init {
        /// Overwrite the job configuration with defaults
        #[arg(long)]
        force: bool,
    },

    /// Place two sources into the workspace slots
    Upload {
        /// First (reference) source
        file1: PathBuf,

        /// Second source
        file2: PathBuf,
    },

    /// List the columns of the current sources
    Columns {
        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// Run the reconciliation job over the current sources
    Process {
        /// Evaluation date for impairment expiration (defaults to today)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Quiet output (machine-readable)
        #[arg(long)]
        quiet: bool,
    },

    /// Compare two column selections row by row
    Compare {
        /// Columns of the first source, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        columns1: Vec<String>,

        /// Columns of the second source, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        columns2: Vec<String>,
    },

    /// Fetch a generated report: "all", a category name, or "positional"
    Report {
        /// Report type
        report_type: String,

        /// Copy the report to this path instead of printing its location
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}

/// Validate an evaluation date given as YYYY-MM-DD
fn parse_as_of(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: '{}'. Use YYYY-MM-DD.", s))
}
