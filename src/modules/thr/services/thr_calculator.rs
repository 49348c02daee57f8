use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::round_rupiah;
use crate::modules::thr::models::{ThrCategory, ThrResult};

const FULL_TENURE_MONTHS: u32 = 12;

/// THR per Permenaker 6/2016
pub struct ThrCalculator;

impl ThrCalculator {
    /// Whole calendar months between the dates.
    ///
    /// A month counts once its day-of-month is reached; never negative.
    pub fn tenure_months(join_date: NaiveDate, reference_date: NaiveDate) -> u32 {
        if reference_date <= join_date {
            return 0;
        }

        let mut months = (reference_date.year() - join_date.year()) * 12
            + reference_date.month() as i32
            - join_date.month() as i32;

        if reference_date.day() < join_date.day() {
            months -= 1;
        }

        months.max(0) as u32
    }

    /// Entitlement for one employee
    pub fn calculate(
        employee_id: &str,
        join_date: NaiveDate,
        reference_date: NaiveDate,
        base_salary: Decimal,
    ) -> ThrResult {
        let tenure_months = Self::tenure_months(join_date, reference_date);
        let category = ThrCategory::from_tenure(tenure_months);

        let (percentage, amount) = if category == ThrCategory::Ineligible {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let counted = Decimal::from(tenure_months.min(FULL_TENURE_MONTHS));
            let full = Decimal::from(FULL_TENURE_MONTHS);

            // Amount from the unrounded fraction
            let amount = round_rupiah(counted * base_salary.max(Decimal::ZERO) / full);
            let percentage = (counted * Decimal::ONE_HUNDRED / full)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            (percentage, amount)
        };

        ThrResult {
            employee_id: employee_id.to_string(),
            join_date,
            reference_date,
            tenure_months,
            base_salary,
            percentage,
            amount,
            category,
        }
    }
}
