//! Document service applying the engine to whole documents.
//!
//! Every operation is bottom-up: lines are re-derived against the header
//! rates first, then the header is aggregated from the derived lines. Each
//! returns a new document and leaves its input untouched.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::DocumentHeader;
use crate::aggregate::{JournalBalance, aggregate_header, journal_balance};
use crate::error::CalcError;
use crate::line::{DocumentLine, ExchangeRates, recalculate_all};
use crate::policy::CalcContext;

/// Recalculates documents under one calculation context.
#[derive(Debug, Clone, Copy)]
pub struct DocumentCalculator {
    ctx: CalcContext,
}

impl DocumentCalculator {
    /// Creates a calculator for the given context.
    #[must_use]
    pub const fn new(ctx: CalcContext) -> Self {
        Self { ctx }
    }

    /// The context this calculator applies.
    #[must_use]
    pub const fn context(&self) -> &CalcContext {
        &self.ctx
    }

    /// Re-derives every line and rebuilds the header totals.
    #[must_use]
    pub fn recalculate<L: DocumentLine>(&self, doc: &DocumentHeader<L>) -> DocumentHeader<L> {
        self.rebuild(doc, doc.rates(), doc.data_details.clone())
    }

    /// Applies new header rates and recalculates every line against them.
    ///
    /// Rates are rounded to the configured rate precision first.
    #[must_use]
    pub fn change_exchange_rates<L: DocumentLine>(
        &self,
        doc: &DocumentHeader<L>,
        rates: ExchangeRates,
    ) -> DocumentHeader<L> {
        let rates = rates.normalized(&self.ctx.decimals);
        debug!(
            exh_rate = %rates.exh_rate,
            cty_exh_rate = %rates.cty_exh_rate,
            "exchange rates changed"
        );
        self.rebuild(doc, rates, doc.data_details.clone())
    }

    /// Appends a line numbered after the current last line.
    #[must_use]
    pub fn add_line<L: DocumentLine>(&self, doc: &DocumentHeader<L>, line: L) -> DocumentHeader<L> {
        let mut lines = doc.data_details.clone();
        let mut line = line;
        line.set_item_no(next_item_no(&lines));
        lines.push(line);
        self.rebuild(doc, doc.rates(), lines)
    }

    /// Edits the line with the given item number, then recalculates.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::LineNotFound` if no line has `item_no`.
    pub fn update_line<L, F>(
        &self,
        doc: &DocumentHeader<L>,
        item_no: u32,
        edit: F,
    ) -> Result<DocumentHeader<L>, CalcError>
    where
        L: DocumentLine,
        F: FnOnce(&mut L),
    {
        let mut lines = doc.data_details.clone();
        let line = lines
            .iter_mut()
            .find(|line| line.item_no() == item_no)
            .ok_or(CalcError::LineNotFound(item_no))?;
        edit(line);
        Ok(self.rebuild(doc, doc.rates(), lines))
    }

    /// Removes the line with the given item number and renumbers the rest
    /// contiguously from 1.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::LineNotFound` if no line has `item_no`.
    pub fn remove_line<L: DocumentLine>(
        &self,
        doc: &DocumentHeader<L>,
        item_no: u32,
    ) -> Result<DocumentHeader<L>, CalcError> {
        let position = doc
            .data_details
            .iter()
            .position(|line| line.item_no() == item_no)
            .ok_or(CalcError::LineNotFound(item_no))?;

        let mut lines = doc.data_details.clone();
        lines.remove(position);
        for (line, number) in lines.iter_mut().zip(1u32..) {
            line.set_item_no(number);
        }
        Ok(self.rebuild(doc, doc.rates(), lines))
    }

    /// Debit and credit postings per tier, from freshly derived lines.
    #[must_use]
    pub fn balance<L: DocumentLine>(&self, doc: &DocumentHeader<L>) -> JournalBalance {
        let lines = recalculate_all(&doc.data_details, doc.rates(), &self.ctx);
        journal_balance(&lines, &self.ctx)
    }

    fn rebuild<L: DocumentLine>(
        &self,
        doc: &DocumentHeader<L>,
        rates: ExchangeRates,
        lines: Vec<L>,
    ) -> DocumentHeader<L> {
        self.check_rates(rates, lines.len());

        let data_details = recalculate_all(&lines, rates, &self.ctx);
        let totals = aggregate_header(&data_details, &self.ctx);
        debug!(
            lines = data_details.len(),
            policy = ?self.ctx.policy,
            tot_amt = %totals.tot_amt,
            tot_local_amt = %totals.tot_local_amt,
            is_debit = totals.is_debit,
            "recalculated document"
        );

        DocumentHeader {
            currency_id: doc.currency_id.clone(),
            exh_rate: rates.exh_rate,
            cty_exh_rate: rates.cty_exh_rate,
            data_details,
            totals,
            extra: doc.extra.clone(),
        }
    }

    fn check_rates(&self, rates: ExchangeRates, line_count: usize) {
        if line_count == 0 {
            return;
        }
        if rates.exh_rate <= Decimal::ZERO {
            warn!(
                exh_rate = %rates.exh_rate,
                "exchange rate is not positive; local amounts will not reflect the base amounts"
            );
        }
        if self.ctx.has_country_currency && rates.cty_exh_rate <= Decimal::ZERO {
            warn!(
                cty_exh_rate = %rates.cty_exh_rate,
                "country exchange rate is not positive; country amounts will not reflect the base amounts"
            );
        }
    }
}

fn next_item_no<L: DocumentLine>(lines: &[L]) -> u32 {
    lines
        .iter()
        .map(|line| line.item_no())
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}
