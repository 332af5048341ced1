//! Per-line derivation and batch recalculation.
//!
//! Derivation order for one line:
//! 1. `gst_amt       = round(tot_amt * gst% / 100, amt_dec)`
//! 2. `tot_local_amt = round(tot_amt * exh_rate, loc_amt_dec)`
//! 3. `gst_local_amt = round(gst_amt * exh_rate, loc_amt_dec)`
//! 4. country tier the same way with `cty_exh_rate`, or zero when off
//!
//! All conversions multiply by the forward rate. The only division is by
//! the constant 100 and by a rate in `base_from_local`, which guards zero.

use kira_shared::Decimals;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{DocumentLine, LineAmounts};
use crate::policy::CalcContext;
use crate::rounding::{convert, round, round_step, saturating_div, saturating_mul};

/// Header exchange rates applied to every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRates {
    /// Base to local multiplier.
    pub exh_rate: Decimal,
    /// Base to country multiplier.
    pub cty_exh_rate: Decimal,
}

impl ExchangeRates {
    /// Creates a rate pair.
    #[must_use]
    pub const fn new(exh_rate: Decimal, cty_exh_rate: Decimal) -> Self {
        Self {
            exh_rate,
            cty_exh_rate,
        }
    }

    /// Same-currency rates: both multipliers are one.
    #[must_use]
    pub const fn unity() -> Self {
        Self::new(Decimal::ONE, Decimal::ONE)
    }

    /// Rounds both rates to the configured rate precision.
    #[must_use]
    pub fn normalized(self, decimals: &Decimals) -> Self {
        Self::new(
            round(self.exh_rate, decimals.exh_rate_dec),
            round(self.cty_exh_rate, decimals.exh_rate_dec),
        )
    }
}

/// Derives GST, local and country amounts from a base amount.
///
/// With step rounding on, the base amount itself is rounded to `amt_dec`
/// before it feeds the products.
#[must_use]
pub fn derive_amounts(
    tot_amt: Decimal,
    gst_percentage: Decimal,
    rates: ExchangeRates,
    ctx: &CalcContext,
) -> LineAmounts {
    let d = &ctx.decimals;
    let tot_amt = round_step(tot_amt, ctx.step(d.amt_dec));

    let gst_amt = round(
        saturating_mul(tot_amt, gst_percentage) / Decimal::ONE_HUNDRED,
        d.amt_dec,
    );
    let tot_local_amt = convert(tot_amt, rates.exh_rate, d.loc_amt_dec);
    let gst_local_amt = convert(gst_amt, rates.exh_rate, d.loc_amt_dec);

    let (tot_cty_amt, gst_cty_amt) = if ctx.has_country_currency {
        (
            convert(tot_amt, rates.cty_exh_rate, d.cty_amt_dec),
            convert(gst_amt, rates.cty_exh_rate, d.cty_amt_dec),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    LineAmounts {
        tot_amt,
        gst_amt,
        tot_local_amt,
        gst_local_amt,
        tot_cty_amt,
        gst_cty_amt,
    }
}

/// Returns a copy of `line` with its derived amounts recomputed.
#[must_use]
pub fn derive_line<L: DocumentLine>(line: &L, rates: ExchangeRates, ctx: &CalcContext) -> L {
    let amounts = derive_amounts(line.base_amount(), line.gst_percentage(), rates, ctx);
    trace!(
        item_no = line.item_no(),
        tot_amt = %amounts.tot_amt,
        gst_amt = %amounts.gst_amt,
        tot_local_amt = %amounts.tot_local_amt,
        "derived line amounts"
    );

    let mut derived = line.clone();
    derived.set_amounts(amounts);
    derived
}

/// Re-derives every line against the given rates.
///
/// Order and length are preserved; no line is added or dropped.
#[must_use]
pub fn recalculate_all<L: DocumentLine>(
    lines: &[L],
    rates: ExchangeRates,
    ctx: &CalcContext,
) -> Vec<L> {
    lines
        .iter()
        .map(|line| derive_line(line, rates, ctx))
        .collect()
}

/// Base amount from quantity and unit price.
///
/// Quantity and price are first brought to their own precision, the
/// product is rounded once to `amt_dec`.
#[must_use]
pub fn line_amount(qty: Decimal, unit_price: Decimal, decimals: &Decimals) -> Decimal {
    let qty = round(qty, decimals.qty_dec);
    let unit_price = round(unit_price, decimals.price_dec);
    round(saturating_mul(qty, unit_price), decimals.amt_dec)
}

/// Converts a local amount back to base currency.
///
/// Returns zero when `exh_rate` is zero or negative.
#[must_use]
pub fn base_from_local(local_amt: Decimal, exh_rate: Decimal, amt_dec: u32) -> Decimal {
    if exh_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round(saturating_div(local_amt, exh_rate), amt_dec)
}
