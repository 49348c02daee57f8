use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Statutory social-insurance rates in percent, plus the wage caps for JP and health.
///
/// Immutable once constructed; a new regulation year is a new value, so historical
/// rates can be replayed in isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRates {
    pub jht_employer_percent: Decimal,
    pub jht_employee_percent: Decimal,
    /// JKK employer rate indexed by risk class 1..=5
    pub jkk_percent_by_risk_class: Vec<Decimal>,
    pub jkm_employer_percent: Decimal,
    pub jp_employer_percent: Decimal,
    pub jp_employee_percent: Decimal,
    pub jp_wage_cap: Decimal,
    pub health_employer_percent: Decimal,
    pub health_employee_percent: Decimal,
    pub health_wage_cap: Decimal,
}

impl Default for ContributionRates {
    /// Rates in force for 2024 payrolls
    fn default() -> Self {
        Self {
            jht_employer_percent: Decimal::new(37, 1),
            jht_employee_percent: Decimal::new(2, 0),
            jkk_percent_by_risk_class: vec![
                Decimal::new(24, 2),
                Decimal::new(54, 2),
                Decimal::new(89, 2),
                Decimal::new(127, 2),
                Decimal::new(174, 2),
            ],
            jkm_employer_percent: Decimal::new(3, 1),
            jp_employer_percent: Decimal::new(2, 0),
            jp_employee_percent: Decimal::new(1, 0),
            jp_wage_cap: Decimal::new(10_042_300, 0),
            health_employer_percent: Decimal::new(4, 0),
            health_employee_percent: Decimal::new(1, 0),
            health_wage_cap: Decimal::new(12_000_000, 0),
        }
    }
}

impl ContributionRates {
    /// JKK rate for a risk class; anything outside 1..=5 falls back to class 1
    pub fn jkk_percent(&self, risk_class: u8) -> Decimal {
        let index = match risk_class {
            1..=5 => (risk_class - 1) as usize,
            _ => 0,
        };

        self.jkk_percent_by_risk_class
            .get(index)
            .or_else(|| self.jkk_percent_by_risk_class.first())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Reject tables that could not come from a regulation
    pub fn validate(&self) -> Result<()> {
        if self.jkk_percent_by_risk_class.len() != 5 {
            return Err(AppError::Configuration(format!(
                "JKK table must have 5 risk classes, got {}",
                self.jkk_percent_by_risk_class.len()
            )));
        }

        let percents = [
            self.jht_employer_percent,
            self.jht_employee_percent,
            self.jkm_employer_percent,
            self.jp_employer_percent,
            self.jp_employee_percent,
            self.health_employer_percent,
            self.health_employee_percent,
        ];
        let all = percents.iter().chain(self.jkk_percent_by_risk_class.iter());
        for percent in all {
            if *percent < Decimal::ZERO || *percent > Decimal::ONE_HUNDRED {
                return Err(AppError::Configuration(format!(
                    "Contribution percent out of range: {}",
                    percent
                )));
            }
        }

        if self.jp_wage_cap <= Decimal::ZERO || self.health_wage_cap <= Decimal::ZERO {
            return Err(AppError::Configuration(
                "Contribution wage caps must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Itemized contributions for one wage, embedded into the payslip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContributionResult {
    pub jht_employer: Decimal,
    pub jht_employee: Decimal,
    pub jkk_employer: Decimal,
    pub jkm_employer: Decimal,
    pub jp_employer: Decimal,
    pub jp_employee: Decimal,
    pub health_employer: Decimal,
    pub health_employee: Decimal,
    /// Sum of the five employer-side items
    pub employer_total: Decimal,
    /// Sum of the three employee-side items
    pub employee_total: Decimal,
}
