//! Common types used across the workspace.

pub mod decimals;
pub mod lenient;

pub use decimals::{Decimals, FinanceSettings, MAX_DECIMALS};
