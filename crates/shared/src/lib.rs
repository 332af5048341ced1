//! Shared types, errors, and configuration for Kira.
//!
//! This crate provides common types used across all other crates:
//! - Per-tenant decimal precision and finance feature settings
//! - Lenient numeric coercion for inbound document JSON
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{Decimals, FinanceSettings};
