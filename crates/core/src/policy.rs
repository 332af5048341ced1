//! Per-module calculation policy.
//!
//! AP, AR, GL and CB documents share one engine. What differs between them
//! is captured here as data: whether intermediate accumulations are rounded,
//! whether the header nets debit and credit lines, and which lines feed the
//! header totals.

use std::fmt;
use std::str::FromStr;

use kira_shared::{Decimals, FinanceSettings};
use kira_shared::types::MAX_DECIMALS;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Which lines contribute to header totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLines {
    /// Every line contributes.
    #[default]
    All,
    /// Only lines flagged as debit contribute.
    ///
    /// Observed in GL journal headers. A balancing journal total that ignores
    /// credit lines is unusual; kept as observed pending product sign-off.
    DebitOnly,
}

impl HeaderLines {
    /// Returns true if a line with the given debit flag contributes.
    #[must_use]
    pub fn includes(self, is_debit: bool) -> bool {
        match self {
            Self::All => true,
            Self::DebitOnly => is_debit,
        }
    }
}

/// How a document's amounts are derived and aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcPolicy {
    /// Round every intermediate accumulation, not just boundaries.
    pub round_each_step: bool,
    /// Header is the signed debit/credit net of the lines.
    pub netting: bool,
    /// Lines feeding non-netting header totals.
    pub header_lines: HeaderLines,
}

impl CalcPolicy {
    /// Boundary rounding, all lines, plain sums.
    pub const STANDARD: Self = Self {
        round_each_step: false,
        netting: false,
        header_lines: HeaderLines::All,
    };

    /// Debit/credit netting for adjustment documents.
    pub const NETTING: Self = Self {
        round_each_step: false,
        netting: true,
        header_lines: HeaderLines::All,
    };

    /// GL journal: step rounding, debit lines only.
    pub const JOURNAL: Self = Self {
        round_each_step: true,
        netting: false,
        header_lines: HeaderLines::DebitOnly,
    };
}

/// Document modules with their own calculation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentModule {
    /// Accounts payable invoice.
    ApInvoice,
    /// Accounts payable debit/credit adjustment.
    ApAdjustment,
    /// Accounts receivable invoice.
    ArInvoice,
    /// Accounts receivable debit/credit adjustment.
    ArAdjustment,
    /// General ledger journal.
    GlJournal,
    /// Cash book batch payment.
    CbBatchPayment,
}

impl DocumentModule {
    /// All modules, in display order.
    pub const ALL: [Self; 6] = [
        Self::ApInvoice,
        Self::ApAdjustment,
        Self::ArInvoice,
        Self::ArAdjustment,
        Self::GlJournal,
        Self::CbBatchPayment,
    ];

    /// Returns the calculation policy for this module.
    #[must_use]
    pub const fn policy(self) -> CalcPolicy {
        match self {
            Self::ApInvoice | Self::ArInvoice | Self::CbBatchPayment => CalcPolicy::STANDARD,
            Self::ApAdjustment | Self::ArAdjustment => CalcPolicy::NETTING,
            Self::GlJournal => CalcPolicy::JOURNAL,
        }
    }

    /// Returns the kebab-case module name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApInvoice => "ap-invoice",
            Self::ApAdjustment => "ap-adjustment",
            Self::ArInvoice => "ar-invoice",
            Self::ArAdjustment => "ar-adjustment",
            Self::GlJournal => "gl-journal",
            Self::CbBatchPayment => "cb-batch-payment",
        }
    }
}

impl fmt::Display for DocumentModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentModule {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|module| module.as_str() == normalized)
            .ok_or_else(|| CalcError::UnknownModule(s.to_string()))
    }
}

/// Read-only context injected into every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcContext {
    /// Tenant decimal precision.
    pub decimals: Decimals,
    /// Whether the country currency tier is computed.
    pub has_country_currency: bool,
    /// Module calculation policy.
    pub policy: CalcPolicy,
}

impl CalcContext {
    /// Creates a context after checking the precision is representable.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::InvalidDecimals` if any decimal count exceeds
    /// the maximum `Decimal` scale.
    pub fn new(
        decimals: Decimals,
        has_country_currency: bool,
        policy: CalcPolicy,
    ) -> Result<Self, CalcError> {
        if let Some((field, value)) = decimals.oversized_field() {
            return Err(CalcError::InvalidDecimals {
                field,
                value,
                max: MAX_DECIMALS,
            });
        }
        Ok(Self {
            decimals,
            has_country_currency,
            policy,
        })
    }

    /// Creates the context for a module from tenant settings.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::InvalidDecimals` if the precision is invalid.
    pub fn for_module(
        decimals: Decimals,
        finance: FinanceSettings,
        module: DocumentModule,
    ) -> Result<Self, CalcError> {
        Self::new(decimals, finance.has_country_currency, module.policy())
    }

    /// Precision applied to intermediate accumulations of a tier, if any.
    #[must_use]
    pub(crate) fn step(&self, decimal_places: u32) -> Option<u32> {
        self.policy.round_each_step.then_some(decimal_places)
    }
}
