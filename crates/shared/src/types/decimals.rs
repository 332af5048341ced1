//! Per-tenant decimal precision and finance feature settings.
//!
//! Both are loaded once per session and passed into every calculation as
//! read-only context. Nothing in the engine reaches for them globally.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Largest scale a `rust_decimal::Decimal` can carry.
pub const MAX_DECIMALS: u32 = 28;

/// Number of fractional digits used by each currency tier and input kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decimals {
    /// Base/document currency amounts.
    #[serde(default = "default_amount_dec", alias = "amtDec")]
    pub amt_dec: u32,
    /// Local/functional currency amounts.
    #[serde(default = "default_amount_dec", alias = "locAmtDec")]
    pub loc_amt_dec: u32,
    /// Country/reporting currency amounts.
    #[serde(default = "default_amount_dec", alias = "ctyAmtDec")]
    pub cty_amt_dec: u32,
    /// Line quantities.
    #[serde(default = "default_qty_dec", alias = "qtyDec")]
    pub qty_dec: u32,
    /// Unit prices.
    #[serde(default = "default_price_dec", alias = "priceDec")]
    pub price_dec: u32,
    /// Exchange rates.
    #[serde(default = "default_exh_rate_dec", alias = "exhRateDec")]
    pub exh_rate_dec: u32,
}

fn default_amount_dec() -> u32 {
    2
}

fn default_qty_dec() -> u32 {
    4
}

fn default_price_dec() -> u32 {
    4
}

fn default_exh_rate_dec() -> u32 {
    10
}

impl Default for Decimals {
    fn default() -> Self {
        Self {
            amt_dec: default_amount_dec(),
            loc_amt_dec: default_amount_dec(),
            cty_amt_dec: default_amount_dec(),
            qty_dec: default_qty_dec(),
            price_dec: default_price_dec(),
            exh_rate_dec: default_exh_rate_dec(),
        }
    }
}

impl Decimals {
    /// Creates a precision config with the same decimals for all three
    /// currency tiers and defaults for the rest.
    #[must_use]
    pub fn uniform(amount_dec: u32) -> Self {
        Self {
            amt_dec: amount_dec,
            loc_amt_dec: amount_dec,
            cty_amt_dec: amount_dec,
            ..Self::default()
        }
    }

    /// Returns the first field whose decimal count exceeds `MAX_DECIMALS`.
    #[must_use]
    pub fn oversized_field(&self) -> Option<(&'static str, u32)> {
        [
            ("amt_dec", self.amt_dec),
            ("loc_amt_dec", self.loc_amt_dec),
            ("cty_amt_dec", self.cty_amt_dec),
            ("qty_dec", self.qty_dec),
            ("price_dec", self.price_dec),
            ("exh_rate_dec", self.exh_rate_dec),
        ]
        .into_iter()
        .find(|(_, value)| *value > MAX_DECIMALS)
    }

    /// Checks that every decimal count fits a `Decimal` scale.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first offending field.
    pub fn validate(&self) -> AppResult<()> {
        match self.oversized_field() {
            Some((field, value)) => Err(AppError::Validation(format!(
                "{field} is {value}, maximum is {MAX_DECIMALS}"
            ))),
            None => Ok(()),
        }
    }
}

/// Tenant finance settings that switch optional amount tiers on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSettings {
    /// Whether the tenant reports in a third (country) currency.
    #[serde(default, alias = "hasCountryCurrency")]
    pub has_country_currency: bool,
}

#[cfg(test)]
#[path = "decimals_tests.rs"]
mod tests;
