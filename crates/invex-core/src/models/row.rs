//! Accounting row in the shape of a Stereo received-invoice import.

use serde::{Deserialize, Serialize};

/// Exchange rate applied to an invoice total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeRate {
    /// Invoice is already in the home currency.
    Home,
    /// Rate looked up from the forex provider, always carried as a float
    /// (an integer quote of 25 is written as `25,0`).
    Quoted(f64),
}

impl ExchangeRate {
    /// Numeric value of the rate.
    pub fn value(&self) -> f64 {
        match self {
            Self::Home => 1.0,
            Self::Quoted(rate) => *rate,
        }
    }
}

/// One normalized, numbered row ready for export.
///
/// Czech column names of the import are noted on each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingRow {
    /// Document code, e.g. `pf0001` (Doklad).
    pub document_code: String,

    /// Zero-padded document number (Číslo dokladu).
    pub document_number: String,

    /// Ledger agenda (Agenda).
    pub agenda: String,

    /// Document series (Řada dokladu).
    pub series: String,

    /// Document kind (Druh).
    pub kind: String,

    /// Issue date as `DD.MM.YYYY` (Okamžik vystavení).
    pub issued: String,

    /// Taxable supply date, same as `issued` (Okamžik uskutečnění).
    pub supplied: String,

    /// Due date, same as `issued` (Datum splatnosti).
    pub due: String,

    /// Free text (Text).
    pub description: String,

    /// VAT rate in percent (Sazba DPH).
    pub tax_rate: Option<f64>,

    /// Total in the invoice currency (Celkem v cizí měně).
    pub total_amount: f64,

    /// Total converted to the home currency (Celkem).
    pub total_home: f64,

    /// Currency, with the home currency shown as its symbol (Měna).
    pub currency: String,

    /// Supplier (Název firmy).
    pub supplier_name: String,

    /// Invoice language (Jazyk faktury).
    pub invoice_language: String,

    /// Payment reference, `"0"` when the invoice has none (Variabilní symbol).
    pub variable_symbol: String,

    /// Conversion rate (Kurz).
    pub rate: ExchangeRate,

    /// Credit account (Dal).
    pub credit_account: String,

    /// Debit account, chosen by invoice language (Má dáti).
    pub debit_account: String,

    /// Document type (Typ dokladu).
    pub doc_type: String,

    /// Supplier's invoice number (Související doklad).
    pub invoice_id: String,
}
