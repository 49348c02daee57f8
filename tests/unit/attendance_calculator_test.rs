/// Tests for business-day counting, pro-ration, late penalties and overtime
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use gajian::modules::attendance::{AttendanceCalculator, AttendanceRecord, OvertimeCalculator, OvertimeEntry};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn record(day: NaiveDate, check_in: Option<NaiveTime>) -> AttendanceRecord {
    AttendanceRecord {
        employee_id: "emp-1".to_string(),
        date: day,
        check_in,
    }
}

fn overtime(hours: Decimal, is_holiday: bool) -> OvertimeEntry {
    OvertimeEntry {
        employee_id: "emp-1".to_string(),
        date: date(2025, 3, 4),
        hours,
        is_holiday,
    }
}

proptest! {
    /// Property: any seven consecutive days hold exactly five business days
    #[test]
    fn test_full_week_has_five_business_days(offset in 0i64..3_650i64) {
        let start = date(2020, 1, 1) + Duration::days(offset);
        let end = start + Duration::days(6);

        prop_assert_eq!(AttendanceCalculator::count_business_days(start, end), 5);
    }

    /// Property: business days never exceed calendar days
    #[test]
    fn test_business_days_bounded_by_calendar_days(
        offset in 0i64..3_650i64,
        length in 0i64..120i64,
    ) {
        let start = date(2020, 1, 1) + Duration::days(offset);
        let end = start + Duration::days(length);

        let business = AttendanceCalculator::count_business_days(start, end);
        prop_assert!(i64::from(business) <= length + 1);
    }

    /// Property: pro-rated salary stays within [0, base] for work_days <= total
    #[test]
    fn test_prorate_bounded(
        base in 0u64..100_000_000u64,
        total in 1u32..31u32,
        worked in 0u32..31u32,
    ) {
        let worked = worked.min(total);
        let base = Decimal::from(base);

        let prorated = AttendanceCalculator::prorate(base, worked, total);

        prop_assert!(prorated >= Decimal::ZERO);
        prop_assert!(prorated <= base);
        if worked == total {
            prop_assert_eq!(prorated, base);
        }
    }

    /// Property: working-day overtime weights the first hour at 1.5 and the rest at 2
    #[test]
    fn test_working_day_weighting(tenths in 0u32..200u32) {
        let hours = Decimal::from(tenths) / dec!(10);
        let weighted = OvertimeCalculator::weighted_hours(hours, false);

        let expected = if hours <= Decimal::ONE {
            hours * dec!(1.5)
        } else {
            dec!(1.5) + (hours - Decimal::ONE) * dec!(2)
        };
        prop_assert_eq!(weighted, expected);
    }
}

#[test]
fn test_business_days_in_march_2025() {
    assert_eq!(AttendanceCalculator::count_business_days(date(2025, 3, 1), date(2025, 3, 31)), 21);
    assert_eq!(AttendanceCalculator::count_business_days(date(2025, 3, 17), date(2025, 3, 31)), 11);
}

#[test]
fn test_weekend_only_range_has_no_business_days() {
    let saturday = date(2025, 3, 8);
    assert_eq!(saturday.weekday(), Weekday::Sat);

    assert_eq!(AttendanceCalculator::count_business_days(saturday, saturday + Duration::days(1)), 0);
    assert_eq!(AttendanceCalculator::prorate(dec!(10000000), 0, 0), Decimal::ZERO);
}

#[test]
fn test_prorate_rounds_half_up() {
    // 10,000,000 * 11 / 21 = 5,238,095.238...
    assert_eq!(AttendanceCalculator::prorate(dec!(10000000), 11, 21), dec!(5238095));
    // 1,000,001 / 2 = 500,000.5
    assert_eq!(AttendanceCalculator::prorate(dec!(1000001), 1, 2), dec!(500001));
}

#[test]
fn test_attendance_days_are_distinct_and_in_range() {
    let records = vec![
        record(date(2025, 3, 3), NaiveTime::from_hms_opt(8, 0, 0)),
        record(date(2025, 3, 3), NaiveTime::from_hms_opt(13, 0, 0)),
        record(date(2025, 3, 4), None),
        record(date(2025, 4, 1), NaiveTime::from_hms_opt(8, 0, 0)),
    ];

    assert_eq!(
        AttendanceCalculator::attendance_days(&records, date(2025, 3, 1), date(2025, 3, 31)),
        2
    );
}

#[test]
fn test_late_minutes_and_penalty() {
    let standard = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    let records = vec![
        record(date(2025, 3, 3), NaiveTime::from_hms_opt(7, 45, 0)),
        record(date(2025, 3, 4), NaiveTime::from_hms_opt(8, 10, 0)),
        record(date(2025, 3, 5), NaiveTime::from_hms_opt(8, 25, 30)),
        record(date(2025, 3, 6), None),
    ];

    let minutes = AttendanceCalculator::late_minutes(&records, standard);

    assert_eq!(minutes, 35);
    assert_eq!(AttendanceCalculator::late_penalty(minutes, dec!(1000)), dec!(35000));
}

#[test]
fn test_holiday_overtime_tiers() {
    assert_eq!(OvertimeCalculator::weighted_hours(dec!(8), true), dec!(16));
    assert_eq!(OvertimeCalculator::weighted_hours(dec!(9), true), dec!(19));
    assert_eq!(OvertimeCalculator::weighted_hours(dec!(11), true), dec!(27));
}

#[test]
fn test_overtime_pay_rounds_on_total() {
    let hourly = OvertimeCalculator::hourly_rate(dec!(10000000), dec!(173));
    let entries = vec![overtime(dec!(2), false), overtime(dec!(1), false)];

    // (3.5 + 1.5) * 10,000,000 / 173 = 289,017.34...
    assert_eq!(OvertimeCalculator::overtime_pay(&entries, hourly), dec!(289017));
    assert_eq!(OvertimeCalculator::hourly_rate(dec!(10000000), Decimal::ZERO), Decimal::ZERO);
}
