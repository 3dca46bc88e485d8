//! Configuration structures for the export pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for invex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Accounting constants for the generated rows.
    pub accounting: AccountingConfig,

    /// Forex provider configuration.
    pub forex: ForexConfig,

    /// Extraction service configuration.
    pub extraction: ExtractionConfig,

    /// CSV output configuration.
    pub output: OutputConfig,
}

/// Constants written into every accounting row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountingConfig {
    /// Currency all totals are converted into.
    pub home_currency: String,

    /// Display symbol replacing the home currency code.
    pub home_currency_symbol: String,

    /// Prefix of the document code (`pf` gives `pf0001`).
    pub document_prefix: String,

    pub agenda: String,
    pub series: String,
    pub kind: String,
    pub credit_account: String,

    /// Debit account for invoices in `domestic_language`.
    pub domestic_debit_account: String,

    /// Debit account for all other invoices.
    pub foreign_debit_account: String,

    /// Invoice language treated as domestic.
    pub domestic_language: String,

    pub doc_type: String,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            home_currency: "CZK".to_string(),
            home_currency_symbol: "Kč".to_string(),
            document_prefix: "pf".to_string(),
            agenda: "PF".to_string(),
            series: "pf".to_string(),
            kind: "NS".to_string(),
            credit_account: "321".to_string(),
            domestic_debit_account: "518v".to_string(),
            foreign_debit_account: "518o".to_string(),
            domestic_language: "Czech".to_string(),
            doc_type: "F".to_string(),
        }
    }
}

/// Forex provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForexConfig {
    /// Base URL of the CurrencyScoop-compatible API.
    pub base_url: String,

    /// API key; the `INVEX_FOREX_API_KEY` variable takes precedence.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// How long a fetched rate stays cached, in seconds.
    pub cache_ttl_secs: u64,

    /// Maximum number of cached rates.
    pub cache_capacity: usize,
}

impl Default for ForexConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.currencyscoop.com/v1".to_string(),
            api_key: None,
            timeout_secs: 10,
            cache_ttl_secs: 600,
            cache_capacity: 128,
        }
    }
}

/// Extraction service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Base URL of the OpenAI-compatible API.
    pub api_url: String,

    /// Chat model used for extraction.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Own company name; never reported as the supplier.
    pub own_company: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 120,
            own_company: None,
        }
    }
}

/// Text encoding of the CSV output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Utf8,
    /// Windows-1250, the Central European code page.
    Cp1250,
}

/// CSV output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter.
    pub delimiter: char,

    pub encoding: OutputEncoding,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            encoding: OutputEncoding::Utf8,
        }
    }
}

impl InvexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
