//! Debit/credit netting for adjustment documents.
//!
//! Lines are partitioned by their debit flag, each partition is summed, and
//! the header carries `|debit - credit|` per field. The sign moves into
//! `is_debit`, which is set when the net base total is NEGATIVE, i.e. when
//! credits exceed debits. Downstream numbering depends on this polarity;
//! it is kept as observed pending product sign-off.

use kira_shared::Decimals;
use rust_decimal::Decimal;
use tracing::trace;

use super::{HeaderTotals, TierTotals};
use crate::line::{DocumentLine, LineAmounts};
use crate::policy::CalcContext;
use crate::rounding::{round, round_step, saturating_add, saturating_sub};

/// Nets debit against credit lines at boundary rounding.
///
/// Empty input yields all zeros with `is_debit == false`.
#[must_use]
pub fn aggregate_net<L: DocumentLine>(
    lines: &[L],
    decimals: &Decimals,
    has_country_currency: bool,
) -> HeaderTotals {
    net_amounts(lines, decimals, has_country_currency, false)
}

/// Nets lines under the context's policy, honoring step rounding.
pub(crate) fn net_totals<L: DocumentLine>(lines: &[L], ctx: &CalcContext) -> HeaderTotals {
    net_amounts(
        lines,
        &ctx.decimals,
        ctx.has_country_currency,
        ctx.policy.round_each_step,
    )
}

fn net_amounts<L: DocumentLine>(
    lines: &[L],
    decimals: &Decimals,
    has_country_currency: bool,
    round_each_step: bool,
) -> HeaderTotals {
    if lines.is_empty() {
        return HeaderTotals::default();
    }

    let step = round_each_step.then_some(decimals);
    let (debit, credit) = lines.iter().fold(
        (LineAmounts::default(), LineAmounts::default()),
        |(debit, credit), line| {
            if line.is_debit() {
                (accumulate(debit, &line.amounts(), step), credit)
            } else {
                (debit, accumulate(credit, &line.amounts(), step))
            }
        },
    );
    let net = difference(&debit, &credit);

    let is_debit = net.tot_amt < Decimal::ZERO;
    trace!(
        net_tot_amt = %net.tot_amt,
        is_debit,
        "netted debit and credit lines"
    );

    let base = net_tier(net.tot_amt, net.gst_amt, decimals.amt_dec);
    let local = net_tier(net.tot_local_amt, net.gst_local_amt, decimals.loc_amt_dec);
    let country = if has_country_currency {
        net_tier(net.tot_cty_amt, net.gst_cty_amt, decimals.cty_amt_dec)
    } else {
        TierTotals::ZERO
    };

    HeaderTotals::from_tiers(is_debit, base, local, country)
}

fn net_tier(total: Decimal, gst: Decimal, decimal_places: u32) -> TierTotals {
    TierTotals {
        total: round(total.abs(), decimal_places),
        gst: round(gst.abs(), decimal_places),
        total_after_gst: round(saturating_add(total, gst).abs(), decimal_places),
    }
}

fn accumulate(acc: LineAmounts, amounts: &LineAmounts, step: Option<&Decimals>) -> LineAmounts {
    let add = |sum: Decimal, value: Decimal, dp: Option<u32>| {
        round_step(saturating_add(sum, round_step(value, dp)), dp)
    };
    let base = step.map(|d| d.amt_dec);
    let local = step.map(|d| d.loc_amt_dec);
    let country = step.map(|d| d.cty_amt_dec);

    LineAmounts {
        tot_amt: add(acc.tot_amt, amounts.tot_amt, base),
        gst_amt: add(acc.gst_amt, amounts.gst_amt, base),
        tot_local_amt: add(acc.tot_local_amt, amounts.tot_local_amt, local),
        gst_local_amt: add(acc.gst_local_amt, amounts.gst_local_amt, local),
        tot_cty_amt: add(acc.tot_cty_amt, amounts.tot_cty_amt, country),
        gst_cty_amt: add(acc.gst_cty_amt, amounts.gst_cty_amt, country),
    }
}

fn difference(debit: &LineAmounts, credit: &LineAmounts) -> LineAmounts {
    LineAmounts {
        tot_amt: saturating_sub(debit.tot_amt, credit.tot_amt),
        gst_amt: saturating_sub(debit.gst_amt, credit.gst_amt),
        tot_local_amt: saturating_sub(debit.tot_local_amt, credit.tot_local_amt),
        gst_local_amt: saturating_sub(debit.gst_local_amt, credit.gst_local_amt),
        tot_cty_amt: saturating_sub(debit.tot_cty_amt, credit.tot_cty_amt),
        gst_cty_amt: saturating_sub(debit.gst_cty_amt, credit.gst_cty_amt),
    }
}
