//! Property-based tests for header aggregation and netting.

use kira_shared::Decimals;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{aggregate_base, aggregate_header, aggregate_local, aggregate_net};
use crate::line::{ExchangeRates, LineItem, recalculate_all};
use crate::policy::{CalcContext, CalcPolicy};
use crate::rounding::round;

/// Strategy to generate non-negative amounts (0.000 to 1,000,000.000).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

/// Strategy to generate exchange rates (0.0001 to 100.0000).
fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn decimal_places() -> impl Strategy<Value = u32> {
    0u32..=4
}

fn lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((amount(), 0i64..=25, any::<bool>()), 0..15).prop_map(|rows| {
        rows.into_iter()
            .zip(1u32..)
            .map(|((tot, pct, debit), no)| LineItem::new(no, tot, Decimal::from(pct)).debit(debit))
            .collect()
    })
}

fn context(dp: u32, has_country_currency: bool, policy: CalcPolicy) -> CalcContext {
    CalcContext::new(Decimals::uniform(dp), has_country_currency, policy).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The header base total is the rounded sum of line totals.
    #[test]
    fn prop_base_total_is_rounded_sum(lines in lines(), dp in decimal_places()) {
        let expected = round(lines.iter().map(|l| l.tot_amt).sum::<Decimal>(), dp);
        prop_assert_eq!(aggregate_base(&lines, dp).total, expected);
    }

    /// After-GST is rounded from the unrounded sums, once.
    #[test]
    fn prop_after_gst_rounded_once(
        lines in lines(),
        exh in rate(),
        dp in decimal_places(),
    ) {
        let ctx = context(dp, false, CalcPolicy::STANDARD);
        let derived = recalculate_all(&lines, ExchangeRates::new(exh, exh), &ctx);
        let totals = aggregate_local(&derived, dp);

        let raw: Decimal = derived.iter().map(|l| l.tot_local_amt + l.gst_local_amt).sum();
        prop_assert_eq!(totals.total_after_gst, round(raw, dp));
    }

    /// Standard headers equal the per-tier reducers.
    #[test]
    fn prop_standard_header_matches_reducers(
        lines in lines(),
        exh in rate(),
        dp in decimal_places(),
    ) {
        let ctx = context(dp, false, CalcPolicy::STANDARD);
        let derived = recalculate_all(&lines, ExchangeRates::new(exh, exh), &ctx);
        let header = aggregate_header(&derived, &ctx);

        let base = aggregate_base(&derived, dp);
        let local = aggregate_local(&derived, dp);
        prop_assert_eq!(header.tot_amt, base.total);
        prop_assert_eq!(header.gst_amt, base.gst);
        prop_assert_eq!(header.tot_amt_aft_gst, base.total_after_gst);
        prop_assert_eq!(header.tot_local_amt, local.total);
        prop_assert_eq!(header.tot_local_amt_aft_gst, local.total_after_gst);
        prop_assert!(header.tot_cty_amt.is_zero());
    }

    /// Net amounts are never negative; the sign lives in `is_debit`.
    #[test]
    fn prop_net_amounts_unsigned(lines in lines(), dp in decimal_places()) {
        let totals = aggregate_net(&lines, &Decimals::uniform(dp), true);
        prop_assert!(totals.tot_amt >= Decimal::ZERO);
        prop_assert!(totals.gst_amt >= Decimal::ZERO);
        prop_assert!(totals.tot_amt_aft_gst >= Decimal::ZERO);
        prop_assert!(totals.tot_local_amt >= Decimal::ZERO);
        prop_assert!(totals.tot_cty_amt >= Decimal::ZERO);
    }

    /// Flipping every debit flag flips `is_debit` (unless the net is zero)
    /// and leaves the amounts unchanged.
    #[test]
    fn prop_net_flip_symmetry(lines in lines(), dp in decimal_places()) {
        let decimals = Decimals::uniform(dp);
        let flipped: Vec<LineItem> = lines
            .iter()
            .map(|l| l.clone().debit(!l.is_debit))
            .collect();

        let original = aggregate_net(&lines, &decimals, false);
        let mirrored = aggregate_net(&flipped, &decimals, false);

        prop_assert_eq!(original.tot_amt, mirrored.tot_amt);
        prop_assert_eq!(original.gst_amt, mirrored.gst_amt);
        prop_assert_eq!(original.tot_amt_aft_gst, mirrored.tot_amt_aft_gst);

        let debit: Decimal = lines.iter().filter(|l| l.is_debit).map(|l| l.tot_amt).sum();
        let credit: Decimal = lines.iter().filter(|l| !l.is_debit).map(|l| l.tot_amt).sum();
        if debit != credit {
            prop_assert_ne!(original.is_debit, mirrored.is_debit);
        } else {
            prop_assert!(!original.is_debit && !mirrored.is_debit);
        }
    }

    /// Netting with the country tier off never reports country amounts.
    #[test]
    fn prop_net_country_gated(lines in lines(), exh in rate(), cty in rate()) {
        let ctx = context(2, true, CalcPolicy::NETTING);
        let derived = recalculate_all(&lines, ExchangeRates::new(exh, cty), &ctx);
        let totals = aggregate_net(&derived, &ctx.decimals, false);

        prop_assert!(totals.tot_cty_amt.is_zero());
        prop_assert!(totals.gst_cty_amt.is_zero());
        prop_assert!(totals.tot_cty_amt_aft_gst.is_zero());
    }
}

#[test]
fn test_empty_inputs_are_zero() {
    let lines: Vec<LineItem> = vec![];
    let base = aggregate_base(&lines, 2);
    assert!(base.total.is_zero() && base.gst.is_zero() && base.total_after_gst.is_zero());

    let net = aggregate_net(&lines, &Decimals::uniform(2), false);
    assert!(!net.is_debit);
    assert!(net.tot_amt.is_zero() && net.tot_local_amt.is_zero());
}
