//! Core calculation engine for Kira.
//!
//! This crate derives the monetary amounts of financial documents: per-line
//! GST and currency conversions, then header totals. It is pure logic with
//! ZERO I/O; settings arrive as a `CalcContext` built by the caller.
//!
//! # Modules
//!
//! - `rounding` - The single rounding rule every amount goes through
//! - `policy` - Document modules and their calculation policies
//! - `line` - Line items and per-line derivation
//! - `aggregate` - Header totals, debit/credit netting and journal balance
//! - `document` - Whole-document recalculation and line editing

pub mod aggregate;
pub mod document;
pub mod error;
pub mod line;
pub mod policy;
pub mod rounding;

pub use aggregate::{
    HeaderTotals, JournalBalance, Tier, TierBalance, TierTotals, aggregate_base,
    aggregate_country, aggregate_header, aggregate_local, aggregate_net, journal_balance,
};
pub use document::{DocumentCalculator, DocumentHeader};
pub use error::CalcError;
pub use line::{
    DocumentLine, ExchangeRates, LineAmounts, LineItem, base_from_local, derive_amounts,
    derive_line, line_amount, recalculate_all,
};
pub use policy::{CalcContext, CalcPolicy, DocumentModule, HeaderLines};
pub use rounding::{convert, round};
