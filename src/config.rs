//! Job configuration: which source columns feed each comparison category

use crate::data::DEFAULT_HEADER_SKIP_ROWS;
use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Performance codes that make a scholarship holder worth reporting
pub const DEFAULT_FLAGGED_PERFORMANCE_CODES: [i64; 3] = [0, 1, 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Identifier column shared by both sources
    pub id_column: String,
    pub columns: CategoryColumns,
    #[serde(default = "default_flagged_codes")]
    pub flagged_performance_codes: Vec<i64>,
    #[serde(default = "default_header_skip_rows")]
    pub header_skip_rows: usize,
    /// TrueType font embedded in the aggregate PDF; system fonts are tried when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_font: Option<PathBuf>,
}

/// Source column bound to each category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryColumns {
    pub bank_account: String,
    pub bank_code: String,
    pub national_id: String,
    pub decree_date: String,
    pub orphan: String,
    pub quota: String,
    pub hearing: String,
    pub vision: String,
    pub period: String,
    pub scholarship_type: String,
    pub performance: String,
    /// Expiration date of the registered impairment, shared by hearing and vision
    pub impairment_expiry: String,
}

fn default_flagged_codes() -> Vec<i64> {
    DEFAULT_FLAGGED_PERFORMANCE_CODES.to_vec()
}

fn default_header_skip_rows() -> usize {
    DEFAULT_HEADER_SKIP_ROWS
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            id_column: "Идентификатор обучающегося".to_string(),
            columns: CategoryColumns {
                bank_account: "ИИК".to_string(),
                bank_code: "БИК".to_string(),
                national_id: "ИИН".to_string(),
                decree_date: "Приказ о назначении стипендии".to_string(),
                orphan: "Сирота".to_string(),
                quota: "Квота".to_string(),
                hearing: "Имеет инвалидность по слуху".to_string(),
                vision: "Имеет инвалидность по зрению".to_string(),
                // The period column has no header text in the register export
                period: "column26".to_string(),
                scholarship_type: "Вид стипендии".to_string(),
                performance: "Общая успеваемость".to_string(),
                impairment_expiry: "Дата окончания инвалидности".to_string(),
            },
            flagged_performance_codes: default_flagged_codes(),
            header_skip_rows: DEFAULT_HEADER_SKIP_ROWS,
            pdf_font: None,
        }
    }
}

impl JobConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: JobConfig = serde_json::from_str(&content).map_err(|e| {
            ReconError::config(format!("invalid config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for column in self.required_columns() {
            if column.trim().is_empty() {
                return Err(ReconError::config("column names must not be empty"));
            }
        }
        if self.flagged_performance_codes.is_empty() {
            return Err(ReconError::config("flagged_performance_codes must not be empty"));
        }
        Ok(())
    }

    /// Identifier plus every category column, in the order they are checked
    pub fn required_columns(&self) -> Vec<&str> {
        let c = &self.columns;
        vec![
            self.id_column.as_str(),
            c.bank_account.as_str(),
            c.bank_code.as_str(),
            c.national_id.as_str(),
            c.decree_date.as_str(),
            c.orphan.as_str(),
            c.quota.as_str(),
            c.hearing.as_str(),
            c.vision.as_str(),
            c.period.as_str(),
            c.scholarship_type.as_str(),
            c.performance.as_str(),
            c.impairment_expiry.as_str(),
        ]
    }
}
