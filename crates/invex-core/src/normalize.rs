//! Normalization of extracted invoices into numbered accounting rows.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, warn};

use crate::error::{InvexError, Result};
use crate::forex::RateProvider;
use crate::models::config::AccountingConfig;
use crate::models::invoice::ExtractedInvoice;
use crate::models::row::{AccountingRow, ExchangeRate};

/// Variable symbol written when the invoice carries none.
pub const DEFAULT_VARIABLE_SYMBOL: &str = "0";

/// Turns extracted invoices into accounting rows.
pub struct Normalizer<'a, R> {
    rates: &'a R,
    config: &'a AccountingConfig,
}

impl<'a, R: RateProvider> Normalizer<'a, R> {
    pub fn new(rates: &'a R, config: &'a AccountingConfig) -> Self {
        Self { rates, config }
    }

    /// Sort `invoices` by date and number them from `start`.
    ///
    /// Fails on the first invoice with a malformed date or a failed rate
    /// lookup; no rows are returned in that case.
    pub async fn normalize(
        &self,
        mut invoices: Vec<ExtractedInvoice>,
        start: u32,
    ) -> Result<Vec<AccountingRow>> {
        // ISO dates order correctly as strings; the sort is stable.
        invoices.sort_by(|a, b| a.date.cmp(&b.date));

        // Counted in u64 so a start near u32::MAX keeps increasing.
        let mut rows = Vec::with_capacity(invoices.len());
        for (sequence, invoice) in (u64::from(start)..).zip(invoices) {
            rows.push(self.normalize_one(invoice, sequence).await?);
        }

        info!("Normalized {} invoices starting at {}", rows.len(), start);
        Ok(rows)
    }

    async fn normalize_one(&self, invoice: ExtractedInvoice, sequence: u64) -> Result<AccountingRow> {
        for issue in invoice.validate() {
            warn!("Invoice {}: {}", invoice.id, issue);
        }

        let (date, display_date) =
            reformat_date(&invoice.date).ok_or_else(|| InvexError::MalformedDate {
                invoice: invoice.id.clone(),
                value: invoice.date.clone(),
            })?;

        let home = self.config.home_currency.trim().to_uppercase();
        let currency = invoice.currency_code();
        let is_home = currency == home;

        let rate = if is_home {
            ExchangeRate::Home
        } else {
            let rate = self.rates.rate(&currency, &home, date).await?;
            debug!("Invoice {}: {}/{} on {} = {}", invoice.id, currency, home, date, rate);
            ExchangeRate::Quoted(rate)
        };

        let number = format!("{:04}", sequence);
        let debit_account = if invoice.invoice_language == self.config.domestic_language {
            &self.config.domestic_debit_account
        } else {
            &self.config.foreign_debit_account
        };

        Ok(AccountingRow {
            document_code: format!("{}{}", self.config.document_prefix, number),
            document_number: number,
            agenda: self.config.agenda.clone(),
            series: self.config.series.clone(),
            kind: self.config.kind.clone(),
            issued: display_date.clone(),
            supplied: display_date.clone(),
            due: display_date,
            description: invoice.description,
            tax_rate: invoice.tax_rate,
            total_amount: invoice.total_amount,
            total_home: round_amount(invoice.total_amount * rate.value()),
            currency: if is_home {
                self.config.home_currency_symbol.clone()
            } else {
                invoice.currency
            },
            supplier_name: invoice.supplier_name,
            invoice_language: invoice.invoice_language,
            variable_symbol: invoice
                .variable_symbol
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_VARIABLE_SYMBOL.to_string()),
            rate,
            credit_account: self.config.credit_account.clone(),
            debit_account: debit_account.clone(),
            doc_type: self.config.doc_type.clone(),
            invoice_id: invoice.id,
        })
    }
}

/// Parse an ISO `YYYY-MM-DD` date and render it as `DD.MM.YYYY`.
pub fn reformat_date(iso: &str) -> Option<(NaiveDate, String)> {
    let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()?;
    Some((date, date.format("%d.%m.%Y").to_string()))
}

/// Round to two decimals, half-to-even on the exact binary value.
pub fn round_amount(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
