//! Common utility functions for tax and cash-flow calculations.
//!
//! This module provides the rounding and ratio helpers shared by the tax
//! engine, the categorizer and the household calculator.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Expresses `part` as a percentage of `whole`, rounded to two places.
///
/// Returns zero when `whole` is zero or negative.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(1), dec!(3)), dec!(33.33));
/// assert_eq!(percent_of(dec!(50), dec!(0)), dec!(0));
/// ```
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(part / whole * Decimal::ONE_HUNDRED)
}

/// Converts an annual amount to a monthly one, rounded to the cent.
pub fn monthly(annual: Decimal) -> Decimal {
    round_half_up(annual / Decimal::from(12))
}
