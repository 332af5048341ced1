//! Journal balance check.
//!
//! Compares debit and credit postings per tier before a journal is handed
//! to a ledger. A line posts its amount after GST on its own side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Tier;
use crate::line::DocumentLine;
use crate::policy::CalcContext;
use crate::rounding::{round, round_step, saturating_add, saturating_sub};

/// Debit and credit sums for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBalance {
    /// Sum of debit postings.
    pub debit: Decimal,
    /// Sum of credit postings.
    pub credit: Decimal,
}

impl TierBalance {
    /// Debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        saturating_sub(self.debit, self.credit)
    }

    /// Whether debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// Per-tier debit and credit totals of a journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalBalance {
    /// Base currency.
    pub base: TierBalance,
    /// Local currency.
    pub local: TierBalance,
    /// Country currency, zero when the tier is off.
    pub country: TierBalance,
}

impl JournalBalance {
    /// A journal balances when its base and local postings both match.
    ///
    /// The country tier is informational and not checked.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.base.is_balanced() && self.local.is_balanced()
    }
}

/// Sums debit and credit postings of every tier.
///
/// Each side is rounded once at the end, or at every step when the policy
/// asks for it.
#[must_use]
pub fn journal_balance<L: DocumentLine>(lines: &[L], ctx: &CalcContext) -> JournalBalance {
    let balance = |tier: Tier| {
        let dp = tier.decimals(&ctx.decimals);
        let step = ctx.step(dp);
        let (debit, credit) =
            lines
                .iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(debit, credit), line| {
                    let amounts = line.amounts();
                    let posting =
                        round_step(saturating_add(tier.total(&amounts), tier.gst(&amounts)), step);
                    if line.is_debit() {
                        (round_step(saturating_add(debit, posting), step), credit)
                    } else {
                        (debit, round_step(saturating_add(credit, posting), step))
                    }
                });
        TierBalance {
            debit: round(debit, dp),
            credit: round(credit, dp),
        }
    };

    JournalBalance {
        base: balance(Tier::Base),
        local: balance(Tier::Local),
        country: if ctx.has_country_currency {
            balance(Tier::Country)
        } else {
            TierBalance::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::{ExchangeRates, LineItem, recalculate_all};
    use crate::policy::CalcPolicy;
    use kira_shared::Decimals;
    use rust_decimal_macros::dec;

    fn ctx(has_country_currency: bool) -> CalcContext {
        CalcContext::new(Decimals::uniform(2), has_country_currency, CalcPolicy::JOURNAL).unwrap()
    }

    #[test]
    fn test_balanced_journal() {
        let ctx = ctx(false);
        let lines = recalculate_all(
            &[
                LineItem::new(1, dec!(500), Decimal::ZERO).debit(true),
                LineItem::new(2, dec!(300), Decimal::ZERO).debit(false),
                LineItem::new(3, dec!(200), Decimal::ZERO).debit(false),
            ],
            ExchangeRates::new(dec!(4.25), Decimal::ZERO),
            &ctx,
        );
        let balance = journal_balance(&lines, &ctx);

        assert_eq!(balance.base.debit, dec!(500));
        assert_eq!(balance.base.credit, dec!(500));
        assert_eq!(balance.local.debit, dec!(2125));
        assert!(balance.is_balanced());
        assert_eq!(balance.local.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_unbalanced_journal() {
        let ctx = ctx(false);
        let lines = recalculate_all(
            &[
                LineItem::new(1, dec!(500), Decimal::ZERO).debit(true),
                LineItem::new(2, dec!(450), Decimal::ZERO).debit(false),
            ],
            ExchangeRates::unity(),
            &ctx,
        );
        let balance = journal_balance(&lines, &ctx);

        assert!(!balance.is_balanced());
        assert_eq!(balance.local.difference(), dec!(50));
    }

    #[test]
    fn test_gst_posts_with_its_line() {
        let ctx = ctx(false);
        let lines = recalculate_all(
            &[
                LineItem::new(1, dec!(100), dec!(6)).debit(true),
                LineItem::new(2, dec!(106), Decimal::ZERO).debit(false),
            ],
            ExchangeRates::unity(),
            &ctx,
        );
        assert!(journal_balance(&lines, &ctx).is_balanced());
    }

    #[test]
    fn test_local_rounding_difference_unbalances() {
        // Base 0.02 = 0.01 + 0.01, but local 0.03 vs 0.015 + 0.015 where
        // each credit posting rounds to 0.02
        let lines = vec![
            LineItem {
                tot_local_amt: dec!(0.03),
                ..LineItem::new(1, dec!(0.02), Decimal::ZERO).debit(true)
            },
            LineItem {
                tot_local_amt: dec!(0.015),
                ..LineItem::new(2, dec!(0.01), Decimal::ZERO).debit(false)
            },
            LineItem {
                tot_local_amt: dec!(0.015),
                ..LineItem::new(3, dec!(0.01), Decimal::ZERO).debit(false)
            },
        ];
        let balance = journal_balance(&lines, &ctx(false));

        assert!(balance.base.is_balanced());
        assert_eq!(balance.local.credit, dec!(0.04));
        assert!(!balance.is_balanced());
    }

    #[test]
    fn test_out_of_range_postings_saturate() {
        let lines = vec![
            LineItem::new(1, dec!(50000000000000000000000000000), Decimal::ZERO).debit(true),
            LineItem::new(2, dec!(50000000000000000000000000000), Decimal::ZERO).debit(true),
            LineItem::new(3, dec!(-50000000000000000000000000000), Decimal::ZERO).debit(false),
        ];
        let balance = journal_balance(&lines, &ctx(false));

        assert_eq!(balance.base.debit, Decimal::MAX);
        assert_eq!(balance.base.credit, dec!(-50000000000000000000000000000));
        assert_eq!(balance.base.difference(), Decimal::MAX);
    }

    #[test]
    fn test_country_tier_gated() {
        let lines = vec![LineItem {
            tot_cty_amt: dec!(12),
            ..LineItem::new(1, dec!(10), Decimal::ZERO).debit(true)
        }];
        assert_eq!(journal_balance(&lines, &ctx(false)).country, TierBalance::default());
        assert_eq!(journal_balance(&lines, &ctx(true)).country.debit, dec!(12));
    }

    #[test]
    fn test_empty_journal_balances() {
        let lines: Vec<LineItem> = vec![];
        let balance = journal_balance(&lines, &ctx(true));
        assert!(balance.is_balanced());
        assert_eq!(balance, JournalBalance::default());
    }
}
