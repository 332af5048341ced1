//! Header aggregation for non-netting documents.

use rust_decimal::Decimal;
use tracing::trace;

use super::{HeaderTotals, Tier, TierTotals, netting};
use crate::line::DocumentLine;
use crate::policy::CalcContext;
use crate::rounding::{round, round_step, saturating_add};

/// Sums one tier across lines.
///
/// Without a step precision the running totals stay unrounded and are
/// rounded once, as is `total + gst`. With one, each contribution and each
/// running subtotal is rounded and "after GST" comes from the rounded sums.
pub(crate) fn sum_tier<'a, L, I>(
    lines: I,
    tier: Tier,
    decimal_places: u32,
    step: Option<u32>,
) -> TierTotals
where
    L: DocumentLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let (total, gst) = lines
        .into_iter()
        .map(|line| line.amounts())
        .fold((Decimal::ZERO, Decimal::ZERO), |(total, gst), amounts| {
            (
                round_step(
                    saturating_add(total, round_step(tier.total(&amounts), step)),
                    step,
                ),
                round_step(
                    saturating_add(gst, round_step(tier.gst(&amounts), step)),
                    step,
                ),
            )
        });

    let total_after_gst = if step.is_some() {
        round(
            saturating_add(round(total, decimal_places), round(gst, decimal_places)),
            decimal_places,
        )
    } else {
        round(saturating_add(total, gst), decimal_places)
    };

    TierTotals {
        total: round(total, decimal_places),
        gst: round(gst, decimal_places),
        total_after_gst,
    }
}

/// Base-currency header totals: `{tot_amt, gst_amt, tot_amt_aft_gst}`.
#[must_use]
pub fn aggregate_base<L: DocumentLine>(lines: &[L], amt_dec: u32) -> TierTotals {
    sum_tier(lines, Tier::Base, amt_dec, None)
}

/// Local-currency header totals.
#[must_use]
pub fn aggregate_local<L: DocumentLine>(lines: &[L], loc_amt_dec: u32) -> TierTotals {
    sum_tier(lines, Tier::Local, loc_amt_dec, None)
}

/// Country-currency header totals.
#[must_use]
pub fn aggregate_country<L: DocumentLine>(lines: &[L], cty_amt_dec: u32) -> TierTotals {
    sum_tier(lines, Tier::Country, cty_amt_dec, None)
}

/// Header totals for a document under the context's policy.
///
/// Netting policies delegate to debit/credit netting. Otherwise the lines
/// selected by the policy are summed per tier; the country tier is zero
/// when switched off.
#[must_use]
pub fn aggregate_header<L: DocumentLine>(lines: &[L], ctx: &CalcContext) -> HeaderTotals {
    if ctx.policy.netting {
        return netting::net_totals(lines, ctx);
    }

    let d = &ctx.decimals;
    let included: Vec<&L> = lines
        .iter()
        .filter(|line| ctx.policy.header_lines.includes(line.is_debit()))
        .collect();
    trace!(
        lines = lines.len(),
        included = included.len(),
        "aggregating header"
    );

    let sum = |tier: Tier| {
        let dp = tier.decimals(d);
        sum_tier(included.iter().copied(), tier, dp, ctx.step(dp))
    };

    let country = if ctx.has_country_currency {
        sum(Tier::Country)
    } else {
        TierTotals::ZERO
    };

    HeaderTotals::from_tiers(false, sum(Tier::Base), sum(Tier::Local), country)
}
