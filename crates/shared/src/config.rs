//! Application configuration management.

use serde::Deserialize;

use crate::error::AppResult;
use crate::types::{Decimals, FinanceSettings};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Tenant decimal precision.
    #[serde(default)]
    pub decimals: Decimals,
    /// Tenant finance feature switches.
    #[serde(default)]
    pub finance: FinanceSettings,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later overriding earlier: `config/default`,
    /// `config/{RUN_MODE}`, then `KIRA__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KIRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Loads and validates configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if loading fails and
    /// `AppError::Validation` if a decimal count is out of range.
    pub fn load_validated() -> AppResult<Self> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that deserialization alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a decimal count exceeds the
    /// maximum `Decimal` scale.
    pub fn validate(&self) -> AppResult<()> {
        self.decimals.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
