//! Calculation error types.
//!
//! The amount functions themselves are total. Errors only come from
//! addressing lines that do not exist, naming unknown modules, or handing
//! the engine a precision it cannot represent.

use kira_shared::AppError;
use thiserror::Error;

/// Errors that can occur while editing or configuring a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// No line with the given item number exists in the document.
    #[error("Line not found: item {0}")]
    LineNotFound(u32),

    /// The module name does not match any known document module.
    #[error("Unknown document module: {0}")]
    UnknownModule(String),

    /// A decimal count is larger than a `Decimal` can carry.
    #[error("Invalid decimals for {field}: {value} exceeds {max}")]
    InvalidDecimals {
        /// The precision field name.
        field: &'static str,
        /// The configured value.
        value: u32,
        /// The largest allowed value.
        max: u32,
    },
}

impl CalcError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::UnknownModule(_) => "UNKNOWN_MODULE",
            Self::InvalidDecimals { .. } => "INVALID_DECIMALS",
        }
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::LineNotFound(_) => Self::InvalidInput(err.to_string()),
            CalcError::UnknownModule(_) | CalcError::InvalidDecimals { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}
