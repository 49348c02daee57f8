/// Property-based tests for THR entitlement
use chrono::{Months, NaiveDate};
use gajian::thr::{ThrCalculator, ThrCategory};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

proptest! {
    /// Property: the amount never exceeds one month of base salary
    #[test]
    fn test_amount_bounded_by_base_salary(
        base in 0u64..200_000_000u64,
        days_employed in 0i64..5_000i64,
    ) {
        let reference = date(2025, 3, 28);
        let join = reference - chrono::Duration::days(days_employed);
        let base = Decimal::from(base);

        let result = ThrCalculator::calculate("emp-1", join, reference, base);

        prop_assert!(result.amount >= Decimal::ZERO);
        prop_assert!(result.amount <= base);
        prop_assert!(result.percentage <= dec!(100));
        prop_assert_eq!(result.amount, result.amount.trunc());
    }

    /// Property: twelve months or more pays exactly one base salary
    #[test]
    fn test_full_tenure_pays_full_salary(
        base in 1u64..200_000_000u64,
        months in 12u32..240u32,
    ) {
        let join = date(2005, 1, 15);
        let reference = join + Months::new(months);
        let base = Decimal::from(base);

        let result = ThrCalculator::calculate("emp-1", join, reference, base);

        prop_assert_eq!(result.category, ThrCategory::Full);
        prop_assert_eq!(result.amount, base);
        prop_assert_eq!(result.percentage, dec!(100));
    }

    /// Property: pro-rata amount = round(months * base / 12)
    #[test]
    fn test_pro_rata_formula(
        base in 1u64..100_000_000u64,
        months in 1u32..12u32,
    ) {
        let join = date(2024, 2, 10);
        let reference = join + Months::new(months);
        let base = Decimal::from(base);

        let result = ThrCalculator::calculate("emp-1", join, reference, base);

        let expected = (Decimal::from(months) * base / dec!(12))
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(result.category, ThrCategory::ProRata);
        prop_assert_eq!(result.tenure_months, months);
        prop_assert_eq!(result.amount, expected);
    }
}

#[test]
fn test_tenure_counts_whole_months() {
    assert_eq!(ThrCalculator::tenure_months(date(2024, 1, 31), date(2024, 2, 29)), 0);
    assert_eq!(ThrCalculator::tenure_months(date(2024, 1, 15), date(2024, 2, 15)), 1);
    assert_eq!(ThrCalculator::tenure_months(date(2023, 3, 1), date(2025, 3, 1)), 24);
    // Reference before the join date
    assert_eq!(ThrCalculator::tenure_months(date(2025, 6, 1), date(2025, 1, 1)), 0);
}

#[test]
fn test_under_one_month_is_ineligible() {
    let result = ThrCalculator::calculate("emp-1", date(2025, 3, 1), date(2025, 3, 20), dec!(8000000));

    assert_eq!(result.category, ThrCategory::Ineligible);
    assert_eq!(result.amount, Decimal::ZERO);
    assert_eq!(result.percentage, Decimal::ZERO);
}

#[test]
fn test_six_months_pays_half() {
    let result = ThrCalculator::calculate("emp-1", date(2024, 9, 1), date(2025, 3, 1), dec!(10000000));

    assert_eq!(result.tenure_months, 6);
    assert_eq!(result.percentage, dec!(50));
    assert_eq!(result.amount, dec!(5000000));
}
