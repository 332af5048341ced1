//! The single rounding rule shared by every calculation.
//!
//! CRITICAL: Rounding strategy for financial amounts:
//! - Round half away from zero (2.345 -> 2.35, -2.345 -> -2.35)
//! - Round at function boundaries; intermediates stay unrounded unless the
//!   module policy asks for step rounding
//!
//! Arithmetic on document amounts goes through the `saturating_*` helpers.
//! A result outside the `Decimal` range clamps to `Decimal::MAX` or
//! `Decimal::MIN` instead of panicking.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Rounds `value` to `decimal_places` fractional digits, half away from zero.
///
/// Negative values round by magnitude and keep their sign.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use kira_core::rounding::round;
///
/// assert_eq!(round(dec!(2.345), 2), dec!(2.35));
/// assert_eq!(round(dec!(-2.345), 2), dec!(-2.35));
/// ```
#[must_use]
pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Multiplies and rounds once: `round(amount * rate, decimal_places)`.
#[must_use]
pub fn convert(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    round(saturating_mul(amount, rate), decimal_places)
}

/// `a + b`, clamped to the `Decimal` range.
#[must_use]
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| bound(a.is_sign_negative()))
}

/// `a - b`, clamped to the `Decimal` range.
#[must_use]
pub fn saturating_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| bound(a.is_sign_negative()))
}

/// `a * b`, clamped to the `Decimal` range.
#[must_use]
pub fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| bound(a.is_sign_negative() != b.is_sign_negative()))
}

/// `a / b`, clamped to the `Decimal` range. Division by zero yields zero.
#[must_use]
pub fn saturating_div(a: Decimal, b: Decimal) -> Decimal {
    if b.is_zero() {
        return Decimal::ZERO;
    }
    a.checked_div(b)
        .unwrap_or_else(|| bound(a.is_sign_negative() != b.is_sign_negative()))
}

fn bound(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Rounds `value` only when a step-rounding precision is given.
///
/// Used by the step-rounding policy, where intermediate accumulations pass
/// through `round` individually.
#[must_use]
pub(crate) fn round_step(value: Decimal, step: Option<u32>) -> Decimal {
    match step {
        Some(dp) => round(value, dp),
        None => value,
    }
}
