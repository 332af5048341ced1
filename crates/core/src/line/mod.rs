//! Document line items and per-line amount derivation.
//!
//! A line has no identity outside its header's `data_details`. The engine
//! never mutates a caller's line; derivation returns a new record with the
//! derived fields overwritten and everything else passed through.

pub mod derive;

#[cfg(test)]
mod props;

use kira_shared::Decimals;
use kira_shared::types::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use derive::{
    ExchangeRates, base_from_local, derive_amounts, derive_line, line_amount, recalculate_all,
};

/// The amount fields the engine derives on every line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    /// Base/document currency line amount.
    pub tot_amt: Decimal,
    /// GST in base currency.
    pub gst_amt: Decimal,
    /// Line amount in local currency.
    pub tot_local_amt: Decimal,
    /// GST in local currency.
    pub gst_local_amt: Decimal,
    /// Line amount in country currency (zero when the tier is off).
    pub tot_cty_amt: Decimal,
    /// GST in country currency (zero when the tier is off).
    pub gst_cty_amt: Decimal,
}

/// A line record the engine can derive and aggregate.
///
/// Module-specific line shapes (AP invoice detail, AR adjustment detail,
/// GL journal detail, ...) implement this to plug into the engine.
pub trait DocumentLine: Clone {
    /// 1-based position within the document.
    fn item_no(&self) -> u32;

    /// Renumbers the line.
    fn set_item_no(&mut self, item_no: u32);

    /// Base-currency line amount as entered.
    fn base_amount(&self) -> Decimal;

    /// GST percentage, 0-100.
    fn gst_percentage(&self) -> Decimal;

    /// Debit flag for adjustment and journal lines.
    fn is_debit(&self) -> bool {
        false
    }

    /// Currently stored derived amounts.
    fn amounts(&self) -> LineAmounts;

    /// Overwrites the derived amounts.
    fn set_amounts(&mut self, amounts: LineAmounts);
}

/// Generic line record matching the document JSON shape.
///
/// Fields the engine does not know about (account codes, remarks, ...)
/// are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 1-based position within the document.
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub item_no: u32,
    /// Sequence number, kept equal to `item_no` on renumbering.
    #[serde(default, deserialize_with = "lenient::unsigned")]
    pub seq_no: u32,
    /// Quantity, when the line is priced by quantity.
    #[serde(
        default,
        deserialize_with = "lenient::optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty: Option<Decimal>,
    /// Unit price, when the line is priced by quantity.
    #[serde(
        default,
        deserialize_with = "lenient::optional_decimal",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
    /// Base-currency line amount.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_amt: Decimal,
    /// GST percentage.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_percentage: Decimal,
    /// GST in base currency.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_amt: Decimal,
    /// Line amount in local currency.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_local_amt: Decimal,
    /// GST in local currency.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_local_amt: Decimal,
    /// Line amount in country currency.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tot_cty_amt: Decimal,
    /// GST in country currency.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gst_cty_amt: Decimal,
    /// Debit flag for adjustment and journal lines.
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_debit: bool,
    /// Pass-through fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Creates a line from a base amount and GST percentage.
    #[must_use]
    pub fn new(item_no: u32, tot_amt: Decimal, gst_percentage: Decimal) -> Self {
        Self {
            item_no,
            seq_no: item_no,
            tot_amt,
            gst_percentage,
            ..Self::default()
        }
    }

    /// Sets the debit flag.
    #[must_use]
    pub fn debit(mut self, is_debit: bool) -> Self {
        self.is_debit = is_debit;
        self
    }

    /// Returns a copy whose base amount is recomputed from quantity and
    /// unit price. Lines without both keep their entered amount.
    #[must_use]
    pub fn repriced(&self, decimals: &Decimals) -> Self {
        let mut line = self.clone();
        if let (Some(qty), Some(price)) = (self.qty, self.unit_price) {
            line.tot_amt = line_amount(qty, price, decimals);
        }
        line
    }
}

impl DocumentLine for LineItem {
    fn item_no(&self) -> u32 {
        self.item_no
    }

    fn set_item_no(&mut self, item_no: u32) {
        self.item_no = item_no;
        self.seq_no = item_no;
    }

    fn base_amount(&self) -> Decimal {
        self.tot_amt
    }

    fn gst_percentage(&self) -> Decimal {
        self.gst_percentage
    }

    fn is_debit(&self) -> bool {
        self.is_debit
    }

    fn amounts(&self) -> LineAmounts {
        LineAmounts {
            tot_amt: self.tot_amt,
            gst_amt: self.gst_amt,
            tot_local_amt: self.tot_local_amt,
            gst_local_amt: self.gst_local_amt,
            tot_cty_amt: self.tot_cty_amt,
            gst_cty_amt: self.gst_cty_amt,
        }
    }

    fn set_amounts(&mut self, amounts: LineAmounts) {
        self.tot_amt = amounts.tot_amt;
        self.gst_amt = amounts.gst_amt;
        self.tot_local_amt = amounts.tot_local_amt;
        self.gst_local_amt = amounts.gst_local_amt;
        self.tot_cty_amt = amounts.tot_cty_amt;
        self.gst_cty_amt = amounts.gst_cty_amt;
    }
}
