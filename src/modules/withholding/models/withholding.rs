use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::withholding::models::{PtkpCode, TerCategory};

/// Withholding method used for a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxMethod {
    /// Monthly effective rate table (January to November)
    Ter,
    /// Year-end Pasal 17 reconciliation (December)
    Progressive,
}

impl TaxMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ter => "TER",
            Self::Progressive => "PROGRESSIVE",
        }
    }
}

impl std::fmt::Display for TaxMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for TaxMethod {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "TER" => Ok(Self::Ter),
            "PROGRESSIVE" => Ok(Self::Progressive),
            _ => Err(format!("Invalid tax method: {}", value)),
        }
    }
}

/// Year-to-date sums for one employee in one calendar year, excluding the
/// month being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearToDate {
    pub gross: Decimal,
    pub employee_contributions: Decimal,
    pub tax_withheld: Decimal,
}

impl YearToDate {
    /// Fold one earlier month into the running totals
    pub fn add_month(&mut self, gross: Decimal, employee_contributions: Decimal, tax: Decimal) {
        self.gross += gross;
        self.employee_contributions += employee_contributions;
        self.tax_withheld += tax;
    }
}

/// Input for one month's withholding
#[derive(Debug, Clone, Copy)]
pub struct WithholdingInput<'a> {
    pub gross_wage: Decimal,
    pub ptkp_code: &'a str,
    /// Calendar month 1..=12
    pub month: u32,
    /// Employee-side BPJS for the current month
    pub employee_contributions: Decimal,
    /// Only read in December
    pub year_to_date: YearToDate,
}

/// Result of a withholding computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingResult {
    pub tax_amount: Decimal,
    pub method: TaxMethod,
    /// Set for TER months only
    pub category: Option<TerCategory>,
    pub ptkp_code: PtkpCode,
    pub ptkp_value: Decimal,
    /// December only
    pub taxable_income: Option<Decimal>,
    /// December only
    pub annual_tax: Option<Decimal>,
}
