//! The fixed set of comparison categories

use crate::config::JobConfig;
use serde::Serialize;
use std::fmt;

/// How a category decides that a key has a discrepancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Strict inequality of the two raw cells
    Mismatch,
    /// Flag disagreement, annotated with expiration of the impairment date
    Impairment,
    /// Per-side joint condition on scholarship type and performance
    Eligibility,
}

/// Comparison dimension. Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BankAccount,
    BankCode,
    NationalId,
    DecreeDate,
    Orphan,
    Quota,
    Hearing,
    Vision,
    Period,
    Scholarship,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::BankAccount,
        Category::BankCode,
        Category::NationalId,
        Category::DecreeDate,
        Category::Orphan,
        Category::Quota,
        Category::Hearing,
        Category::Vision,
        Category::Period,
        Category::Scholarship,
    ];

    /// Short name used for artifact names and the report index
    pub fn slug(&self) -> &'static str {
        match self {
            Self::BankAccount => "iik",
            Self::BankCode => "bik",
            Self::NationalId => "iin",
            Self::DecreeDate => "date",
            Self::Orphan => "orphan",
            Self::Quota => "quota",
            Self::Hearing => "hearing",
            Self::Vision => "vision",
            Self::Period => "period",
            Self::Scholarship => "scholarship",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.slug() == slug)
    }

    /// Human-readable title for report headings
    pub fn title(&self) -> &'static str {
        match self {
            Self::BankAccount => "bank account (IIK)",
            Self::BankCode => "bank code (BIK)",
            Self::NationalId => "national ID (IIN)",
            Self::DecreeDate => "scholarship decree dates",
            Self::Orphan => "orphan status",
            Self::Quota => "quota",
            Self::Hearing => "hearing impairment",
            Self::Vision => "vision impairment",
            Self::Period => "reporting period",
            Self::Scholarship => "scholarship eligibility",
        }
    }

    /// Field label used in rendered attribute names
    pub fn label(&self) -> &'static str {
        match self {
            Self::BankAccount => "IIK",
            Self::BankCode => "BIK",
            Self::NationalId => "IIN",
            Self::DecreeDate => "Date",
            Self::Orphan => "Orphan",
            Self::Quota => "Quota",
            Self::Hearing => "Hearing",
            Self::Vision => "Vision",
            Self::Period => "Period",
            Self::Scholarship => "Scholarship",
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Self::Hearing | Self::Vision => Rule::Impairment,
            Self::Scholarship => Rule::Eligibility,
            _ => Rule::Mismatch,
        }
    }

    /// Primary source column of the category
    pub fn column<'a>(&self, config: &'a JobConfig) -> &'a str {
        let c = &config.columns;
        match self {
            Self::BankAccount => &c.bank_account,
            Self::BankCode => &c.bank_code,
            Self::NationalId => &c.national_id,
            Self::DecreeDate => &c.decree_date,
            Self::Orphan => &c.orphan,
            Self::Quota => &c.quota,
            Self::Hearing => &c.hearing,
            Self::Vision => &c.vision,
            Self::Period => &c.period,
            Self::Scholarship => &c.scholarship_type,
        }
    }

    /// Ordered attribute names of one rendered entry
    pub fn attribute_names(&self) -> Vec<String> {
        let label = self.label();
        match self.rule() {
            Rule::Mismatch => vec![
                "ID".to_string(),
                format!("File1_{}", label),
                format!("File2_{}", label),
            ],
            Rule::Impairment => vec![
                "ID".to_string(),
                format!("File1_{}", label),
                format!("File2_{}", label),
                "File1_Date".to_string(),
                "File2_Date".to_string(),
                "Expired_File1".to_string(),
                "Expired_File2".to_string(),
            ],
            Rule::Eligibility => vec![
                "ID".to_string(),
                "Side".to_string(),
                "ScholarshipType".to_string(),
                "Performance".to_string(),
            ],
        }
    }

    pub fn artifact_name(&self) -> String {
        format!("report_{}.txt", self.slug())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
