//! Error types for reconciliation operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconError>;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Failed to load source '{source_name}': {message}")]
    Load { source_name: String, message: String },

    #[error("Missing required column '{column}' in source '{source_name}'")]
    MissingColumn { column: String, source_name: String },

    #[error("Report not found or no changes detected: {report}")]
    ReportNotFound { report: String },

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl ReconError {
    pub fn load(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    pub fn missing_column(column: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            source_name: source_name.into(),
        }
    }

    pub fn report_not_found(report: impl Into<String>) -> Self {
        Self::ReportNotFound {
            report: report.into(),
        }
    }

    pub fn workspace(msg: impl Into<String>) -> Self {
        Self::Workspace(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
