//! Property-based tests for rounding and per-line derivation.

use kira_shared::Decimals;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{ExchangeRates, LineItem, derive_line, recalculate_all};
use crate::policy::{CalcContext, CalcPolicy};
use crate::rounding::round;

/// Strategy to generate signed amounts (-1,000,000.000 to 1,000,000.000).
fn amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

/// Strategy to generate GST percentages (0.00 to 100.00).
fn gst_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy to generate exchange rates (0.000000 to 10,000.000000).
fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate decimal places (0 to 6).
fn decimal_places() -> impl Strategy<Value = u32> {
    0u32..=6
}

fn policy() -> impl Strategy<Value = CalcPolicy> {
    prop_oneof![
        Just(CalcPolicy::STANDARD),
        Just(CalcPolicy::NETTING),
        Just(CalcPolicy::JOURNAL),
    ]
}

fn context(dp: u32, has_country_currency: bool, policy: CalcPolicy) -> CalcContext {
    CalcContext::new(Decimals::uniform(dp), has_country_currency, policy).unwrap()
}

fn lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((amount(), gst_percentage(), any::<bool>()), 0..20).prop_map(|rows| {
        rows.into_iter()
            .zip(1u32..)
            .map(|((tot, pct, debit), no)| LineItem::new(no, tot, pct).debit(debit))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Rounding twice at the same precision changes nothing.
    #[test]
    fn prop_round_is_idempotent(value in amount(), dp in decimal_places()) {
        let once = round(value, dp);
        prop_assert_eq!(round(once, dp), once);
    }

    /// Rounding never moves a value by more than half a unit.
    #[test]
    fn prop_round_error_is_bounded(value in amount(), dp in decimal_places()) {
        let half_unit = Decimal::new(5, dp + 1);
        prop_assert!((round(value, dp) - value).abs() <= half_unit);
    }

    /// Rounding is symmetric around zero.
    #[test]
    fn prop_round_is_sign_symmetric(value in amount(), dp in decimal_places()) {
        prop_assert_eq!(round(-value, dp), -round(value, dp));
    }

    /// A zero-amount line derives to all zeros whatever the rates.
    #[test]
    fn prop_zero_amount_derives_zero(
        pct in gst_percentage(),
        exh in rate(),
        cty in rate(),
        dp in decimal_places(),
        country in any::<bool>(),
        policy in policy(),
    ) {
        let ctx = context(dp, country, policy);
        let line = LineItem::new(1, Decimal::ZERO, pct);
        let derived = derive_line(&line, ExchangeRates::new(exh, cty), &ctx);

        prop_assert!(derived.gst_amt.is_zero());
        prop_assert!(derived.tot_local_amt.is_zero());
        prop_assert!(derived.gst_local_amt.is_zero());
        prop_assert!(derived.tot_cty_amt.is_zero());
        prop_assert!(derived.gst_cty_amt.is_zero());
    }

    /// Country amounts stay zero when the tier is switched off.
    #[test]
    fn prop_country_tier_gated(
        lines in lines(),
        exh in rate(),
        cty in rate(),
        dp in decimal_places(),
        policy in policy(),
    ) {
        let ctx = context(dp, false, policy);
        for line in recalculate_all(&lines, ExchangeRates::new(exh, cty), &ctx) {
            prop_assert!(line.tot_cty_amt.is_zero());
            prop_assert!(line.gst_cty_amt.is_zero());
        }
    }

    /// Batch recalculation keeps cardinality and order.
    #[test]
    fn prop_recalculate_preserves_cardinality(
        lines in lines(),
        exh in rate(),
        policy in policy(),
    ) {
        let ctx = context(2, true, policy);
        let out = recalculate_all(&lines, ExchangeRates::new(exh, exh), &ctx);

        prop_assert_eq!(out.len(), lines.len());
        for (before, after) in lines.iter().zip(&out) {
            prop_assert_eq!(before.item_no, after.item_no);
            prop_assert_eq!(before.is_debit, after.is_debit);
        }
    }

    /// Derived amounts carry at most their tier's decimals.
    #[test]
    fn prop_derived_amounts_are_rounded(
        tot in amount(),
        pct in gst_percentage(),
        exh in rate(),
        dp in decimal_places(),
    ) {
        let ctx = context(dp, true, CalcPolicy::STANDARD);
        let derived = derive_line(&LineItem::new(1, tot, pct), ExchangeRates::new(exh, exh), &ctx);

        prop_assert!(derived.gst_amt.scale() <= dp);
        prop_assert!(derived.tot_local_amt.scale() <= dp);
        prop_assert!(derived.gst_local_amt.scale() <= dp);
        prop_assert!(derived.tot_cty_amt.scale() <= dp);
        prop_assert!(derived.gst_cty_amt.scale() <= dp);
    }

    /// Re-deriving an already derived line is a no-op.
    #[test]
    fn prop_derivation_is_stable(
        tot in amount(),
        pct in gst_percentage(),
        exh in rate(),
        policy in policy(),
    ) {
        let ctx = context(2, true, policy);
        let rates = ExchangeRates::new(exh, exh);
        let once = derive_line(&LineItem::new(1, tot, pct), rates, &ctx);
        let twice = derive_line(&once, rates, &ctx);
        prop_assert_eq!(once, twice);
    }
}
