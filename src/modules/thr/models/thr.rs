use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entitlement category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrCategory {
    /// 12 months of service or more
    Full,
    /// 1 to 11 months
    ProRata,
    /// Less than a month
    Ineligible,
}

impl ThrCategory {
    pub fn from_tenure(months: u32) -> Self {
        match months {
            0 => Self::Ineligible,
            1..=11 => Self::ProRata,
            _ => Self::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ProRata => "pro_rata",
            Self::Ineligible => "ineligible",
        }
    }
}

impl std::fmt::Display for ThrCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// THR entitlement of one employee at a reference date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrResult {
    pub employee_id: String,
    pub join_date: NaiveDate,
    pub reference_date: NaiveDate,
    pub tenure_months: u32,
    pub base_salary: Decimal,
    /// Share of base salary, 2 dp, reporting only
    pub percentage: Decimal,
    pub amount: Decimal,
    pub category: ThrCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrFailure {
    pub employee_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThrSummary {
    pub full_count: usize,
    pub pro_rata_count: usize,
    pub ineligible_count: usize,
    pub total_amount: Decimal,
}

impl ThrSummary {
    pub fn from_results(results: &[ThrResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            match result.category {
                ThrCategory::Full => summary.full_count += 1,
                ThrCategory::ProRata => summary.pro_rata_count += 1,
                ThrCategory::Ineligible => summary.ineligible_count += 1,
            }
            summary.total_amount += result.amount;
            summary
        })
    }
}

/// Outcome of a THR run over many employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrBatchResult {
    pub reference_date: NaiveDate,
    pub results: Vec<ThrResult>,
    pub failures: Vec<ThrFailure>,
    pub summary: ThrSummary,
}
