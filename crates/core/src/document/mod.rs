//! Financial documents: a header owning its line items.
//!
//! Header aggregates are not authoritative state. They are rebuilt from
//! `data_details` by the document service on every relevant change.

pub mod service;

use kira_shared::types::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::aggregate::HeaderTotals;
use crate::line::ExchangeRates;

pub use service::DocumentCalculator;

/// Document header as held in form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader<L> {
    /// Currency identifier as the tenant stores it (code or numeric id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_id: Option<Value>,
    /// Base to local exchange rate.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub exh_rate: Decimal,
    /// Base to country exchange rate.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub cty_exh_rate: Decimal,
    /// Line items, in display order.
    #[serde(rename = "data_details", default)]
    pub data_details: Vec<L>,
    /// Derived header aggregates.
    #[serde(flatten)]
    pub totals: HeaderTotals,
    /// Pass-through header fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<L> DocumentHeader<L> {
    /// Creates an empty document with the given rates.
    #[must_use]
    pub fn new(rates: ExchangeRates) -> Self {
        Self {
            currency_id: None,
            exh_rate: rates.exh_rate,
            cty_exh_rate: rates.cty_exh_rate,
            data_details: Vec::new(),
            totals: HeaderTotals::default(),
            extra: Map::new(),
        }
    }

    /// Adds lines, builder style.
    #[must_use]
    pub fn with_lines(mut self, lines: Vec<L>) -> Self {
        self.data_details = lines;
        self
    }

    /// The header's exchange rates.
    #[must_use]
    pub fn rates(&self) -> ExchangeRates {
        ExchangeRates::new(self.exh_rate, self.cty_exh_rate)
    }
}
