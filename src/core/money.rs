use rust_decimal::{Decimal, RoundingStrategy};

/// Rupiah amounts carry no decimal places
pub const RUPIAH_SCALE: u32 = 0;

/// Rounds an amount to whole Rupiah, half-up (midpoint away from zero).
///
/// Every computed payroll figure goes through this function so that exact
/// fixtures are reproducible; banker's rounding is never used.
pub fn round_rupiah(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(RUPIAH_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage (e.g. `3.7` for 3.7%) to an amount and rounds to whole Rupiah
pub fn apply_percent(amount: Decimal, percent: Decimal) -> Decimal {
    round_rupiah(amount * percent / Decimal::ONE_HUNDRED)
}

/// Returns `amount` clamped to zero from below
pub fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}
