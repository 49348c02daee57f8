use rust_decimal::Decimal;

use crate::core::{non_negative, round_rupiah};
use crate::modules::attendance::models::OvertimeEntry;

/// Overtime pay per Kepmenakertrans 102/2004.
///
/// Working day: first hour x1.5, every further hour x2.
/// Rest day / holiday: first 8 hours x2, the 9th hour x3, beyond that x4.
pub struct OvertimeCalculator;

impl OvertimeCalculator {
    /// Hourly wage used as the overtime base
    pub fn hourly_rate(monthly_base: Decimal, divisor: Decimal) -> Decimal {
        if divisor <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        monthly_base / divisor
    }

    /// Hours after applying the multipliers
    pub fn weighted_hours(hours: Decimal, is_holiday: bool) -> Decimal {
        let hours = non_negative(hours);
        let one = Decimal::ONE;
        let eight = Decimal::new(8, 0);
        let nine = Decimal::new(9, 0);

        if is_holiday {
            let first = hours.min(eight);
            let ninth = non_negative(hours.min(nine) - eight);
            let rest = non_negative(hours - nine);
            first * Decimal::TWO + ninth * Decimal::new(3, 0) + rest * Decimal::new(4, 0)
        } else {
            let first = hours.min(one);
            let rest = non_negative(hours - one);
            first * Decimal::new(15, 1) + rest * Decimal::TWO
        }
    }

    /// Overtime pay for a period, rounded once on the total
    pub fn overtime_pay(entries: &[OvertimeEntry], hourly_rate: Decimal) -> Decimal {
        let weighted: Decimal = entries
            .iter()
            .map(|e| Self::weighted_hours(e.hours, e.is_holiday))
            .sum();

        round_rupiah(weighted * hourly_rate)
    }
}
