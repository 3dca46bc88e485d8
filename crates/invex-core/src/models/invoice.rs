//! Invoice record as produced by the extraction service.

use serde::{Deserialize, Serialize};

/// Maximum length of the free-text description requested from the extractor.
pub const MAX_DESCRIPTION_LEN: usize = 50;

/// One invoice as returned by the extraction service.
///
/// Field names on the wire follow the extraction schema, so the Czech
/// `variabilni_symbol` keeps its original spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    /// Supplier's invoice number.
    pub id: String,

    /// Issue date in ISO format (`YYYY-MM-DD`).
    pub date: String,

    /// Short description of the invoiced goods or services.
    pub description: String,

    /// VAT rate in percent, when printed on the invoice.
    #[serde(default)]
    pub tax_rate: Option<f64>,

    /// Gross total in the invoice currency.
    pub total_amount: f64,

    /// Three-letter currency code.
    pub currency: String,

    /// Supplier's company name.
    pub supplier_name: String,

    /// Language the invoice is written in (e.g. "Czech", "English").
    pub invoice_language: String,

    /// Czech payment reference; only present on domestic invoices.
    #[serde(default, rename = "variabilni_symbol")]
    pub variable_symbol: Option<String>,
}

impl ExtractedInvoice {
    /// Currency code trimmed and upper-cased for comparisons and lookups.
    pub fn currency_code(&self) -> String {
        self.currency.trim().to_uppercase()
    }

    /// Check the record for problems worth reporting before export.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.id.trim().is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.supplier_name.trim().is_empty() {
            issues.push("Missing supplier name".to_string());
        }

        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            issues.push(format!(
                "Description longer than {} characters",
                MAX_DESCRIPTION_LEN
            ));
        }

        if self.currency_code().len() != 3 {
            issues.push(format!("Unexpected currency code {:?}", self.currency));
        }

        if !self.total_amount.is_finite() {
            issues.push("Total amount is not a number".to_string());
        }

        issues
    }
}
