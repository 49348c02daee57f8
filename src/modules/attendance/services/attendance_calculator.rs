use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;

use crate::core::round_rupiah;
use crate::modules::attendance::models::AttendanceRecord;
use crate::modules::employees::models::SalaryComponent;

/// Attendance and pro-ration arithmetic for one pay period
pub struct AttendanceCalculator;

impl AttendanceCalculator {
    /// Calendar days in `[start, end]` minus Saturdays and Sundays.
    ///
    /// Public holidays are not subtracted.
    pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }

        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .count() as u32
    }

    /// Distinct dates inside `[start, end]` with at least one attendance row
    pub fn attendance_days(records: &[AttendanceRecord], start: NaiveDate, end: NaiveDate) -> u32 {
        records
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .len() as u32
    }

    /// `round(monthly_base * work_days / total_business_days)`, 0 when there are no business days
    pub fn prorate(monthly_base: Decimal, work_days: u32, total_business_days: u32) -> Decimal {
        if total_business_days == 0 {
            return Decimal::ZERO;
        }

        round_rupiah(monthly_base * Decimal::from(work_days) / Decimal::from(total_business_days))
    }

    /// Sum of `round(per_day * attendance_days)` over active attendance-based components
    pub fn attendance_allowance(components: &[SalaryComponent], attendance_days: u32) -> Decimal {
        components
            .iter()
            .filter(|c| c.is_active && c.is_attendance_based)
            .map(|c| round_rupiah(c.amount * Decimal::from(attendance_days)))
            .sum()
    }

    /// Minutes past `standard_check_in`, summed over records with a check-in
    pub fn late_minutes(records: &[AttendanceRecord], standard_check_in: NaiveTime) -> i64 {
        records
            .iter()
            .filter_map(|r| r.check_in)
            .map(|check_in| (check_in - standard_check_in).num_minutes().max(0))
            .sum()
    }

    /// `round(late_minutes * per_minute_rate)`
    pub fn late_penalty(late_minutes: i64, per_minute_rate: Decimal) -> Decimal {
        round_rupiah(Decimal::from(late_minutes.max(0)) * per_minute_rate)
    }
}
