use rust_decimal::Decimal;

use crate::core::{apply_percent, non_negative, AppError, Result};
use crate::modules::contributions::models::{ContributionRates, ContributionResult};

/// Computes BPJS contributions for a monthly wage
pub trait ContributionCalculator: Send + Sync {
    /// Itemized employer and employee contributions for `wage`.
    ///
    /// Unknown risk classes are treated as class 1.
    fn calculate(&self, wage: Decimal, risk_class: u8) -> ContributionResult;
}

/// Reject wages the calculators must never see
pub fn validate_wage(wage: Decimal) -> Result<()> {
    if wage < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "Wage cannot be negative, got {}",
            wage
        )));
    }
    Ok(())
}

/// Contribution calculator driven by a [`ContributionRates`] table
#[derive(Debug, Clone, Default)]
pub struct BpjsContributionCalculator {
    rates: ContributionRates,
}

impl BpjsContributionCalculator {
    pub fn new(rates: ContributionRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &ContributionRates {
        &self.rates
    }
}

impl ContributionCalculator for BpjsContributionCalculator {
    fn calculate(&self, wage: Decimal, risk_class: u8) -> ContributionResult {
        let rates = &self.rates;
        let wage = non_negative(wage);

        // Caps apply to the wage base before the rate
        let jp_base = wage.min(rates.jp_wage_cap);
        let health_base = wage.min(rates.health_wage_cap);

        let jht_employer = apply_percent(wage, rates.jht_employer_percent);
        let jht_employee = apply_percent(wage, rates.jht_employee_percent);
        let jkk_employer = apply_percent(wage, rates.jkk_percent(risk_class));
        let jkm_employer = apply_percent(wage, rates.jkm_employer_percent);
        let jp_employer = apply_percent(jp_base, rates.jp_employer_percent);
        let jp_employee = apply_percent(jp_base, rates.jp_employee_percent);
        let health_employer = apply_percent(health_base, rates.health_employer_percent);
        let health_employee = apply_percent(health_base, rates.health_employee_percent);

        ContributionResult {
            jht_employer,
            jht_employee,
            jkk_employer,
            jkm_employer,
            jp_employer,
            jp_employee,
            health_employer,
            health_employee,
            employer_total: jht_employer + jkk_employer + jkm_employer + jp_employer + health_employer,
            employee_total: jht_employee + jp_employee + health_employee,
        }
    }
}
