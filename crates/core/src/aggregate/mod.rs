//! Header-level aggregation of derived line amounts.
//!
//! Header totals are never entered; they are recomputed from the lines on
//! every change. Sums run unrounded and are rounded once at the end, unless
//! the policy asks for step rounding.

pub mod balance;
pub mod header;
pub mod netting;

#[cfg(test)]
mod props;

use kira_shared::Decimals;
use kira_shared::types::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::line::LineAmounts;

pub use balance::{JournalBalance, TierBalance, journal_balance};
pub use header::{aggregate_base, aggregate_country, aggregate_header, aggregate_local};
pub use netting::aggregate_net;

/// One of the three currency tiers a line is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Base/document currency.
    Base,
    /// Local/functional currency.
    Local,
    /// Country/reporting currency.
    Country,
}

impl Tier {
    /// Line amount in this tier.
    #[must_use]
    pub fn total(self, amounts: &LineAmounts) -> Decimal {
        match self {
            Self::Base => amounts.tot_amt,
            Self::Local => amounts.tot_local_amt,
            Self::Country => amounts.tot_cty_amt,
        }
    }

    /// GST amount in this tier.
    #[must_use]
    pub fn gst(self, amounts: &LineAmounts) -> Decimal {
        match self {
            Self::Base => amounts.gst_amt,
            Self::Local => amounts.gst_local_amt,
            Self::Country => amounts.gst_cty_amt,
        }
    }

    /// Decimal places used by this tier.
    #[must_use]
    pub fn decimals(self, decimals: &Decimals) -> u32 {
        match self {
            Self::Base => decimals.amt_dec,
            Self::Local => decimals.loc_amt_dec,
            Self::Country => decimals.cty_amt_dec,
        }
    }
}

/// Aggregated amounts for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierTotals {
    /// Sum of line amounts.
    pub total: Decimal,
    /// Sum of GST amounts.
    pub gst: Decimal,
    /// Line amounts plus GST.
    pub total_after_gst: Decimal,
}

impl TierTotals {
    /// All-zero totals.
    pub const ZERO: Self = Self {
        total: Decimal::ZERO,
        gst: Decimal::ZERO,
        total_after_gst: Decimal::ZERO,
    };
}

/// Header aggregate fields, named as on the document header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderTotals {
    /// Debit indicator; only meaningful for netting documents.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_debit: bool,
    /// Base currency total.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_amt: Decimal,
    /// Base currency GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_amt: Decimal,
    /// Base currency total after GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_amt_aft_gst: Decimal,
    /// Local currency total.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_local_amt: Decimal,
    /// Local currency GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_local_amt: Decimal,
    /// Local currency total after GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_local_amt_aft_gst: Decimal,
    /// Country currency total.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_cty_amt: Decimal,
    /// Country currency GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_cty_amt: Decimal,
    /// Country currency total after GST.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_cty_amt_aft_gst: Decimal,
}

impl HeaderTotals {
    /// Assembles header fields from per-tier totals.
    #[must_use]
    pub fn from_tiers(
        is_debit: bool,
        base: TierTotals,
        local: TierTotals,
        country: TierTotals,
    ) -> Self {
        Self {
            is_debit,
            tot_amt: base.total,
            gst_amt: base.gst,
            tot_amt_aft_gst: base.total_after_gst,
            tot_local_amt: local.total,
            gst_local_amt: local.gst,
            tot_local_amt_aft_gst: local.total_after_gst,
            tot_cty_amt: country.total,
            gst_cty_amt: country.gst,
            tot_cty_amt_aft_gst: country.total_after_gst,
        }
    }

    /// Totals of the given tier.
    #[must_use]
    pub fn tier(&self, tier: Tier) -> TierTotals {
        match tier {
            Tier::Base => TierTotals {
                total: self.tot_amt,
                gst: self.gst_amt,
                total_after_gst: self.tot_amt_aft_gst,
            },
            Tier::Local => TierTotals {
                total: self.tot_local_amt,
                gst: self.gst_local_amt,
                total_after_gst: self.tot_local_amt_aft_gst,
            },
            Tier::Country => TierTotals {
                total: self.tot_cty_amt,
                gst: self.gst_cty_amt,
                total_after_gst: self.tot_cty_amt_aft_gst,
            },
        }
    }
}
