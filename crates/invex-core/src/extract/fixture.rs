//! JSON fixtures of extraction results, for development and tests.
//!
//! A fixture is a JSON array of invoice records. Saving one after a real
//! extraction lets later runs skip the extraction service entirely.

use std::path::Path;

use tracing::{info, warn};

use super::{Document, InvoiceExtractor, Result};
use crate::error::ExtractionError;
use crate::models::invoice::ExtractedInvoice;

fn fixture_error(path: &Path, reason: impl ToString) -> ExtractionError {
    ExtractionError::Fixture {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Load invoice records from a fixture file.
pub fn load_fixture(path: &Path) -> Result<Vec<ExtractedInvoice>> {
    let content = std::fs::read_to_string(path).map_err(|e| fixture_error(path, e))?;
    let invoices: Vec<ExtractedInvoice> =
        serde_json::from_str(&content).map_err(|e| fixture_error(path, e))?;

    info!("Loaded {} invoices from fixture {}", invoices.len(), path.display());
    Ok(invoices)
}

/// Write invoice records to a fixture file.
pub fn save_fixture(path: &Path, invoices: &[ExtractedInvoice]) -> Result<()> {
    let content = serde_json::to_string_pretty(invoices).map_err(|e| fixture_error(path, e))?;
    std::fs::write(path, content).map_err(|e| fixture_error(path, e))?;

    info!("Saved {} invoices to fixture {}", invoices.len(), path.display());
    Ok(())
}

/// Extractor replaying a fixed set of records instead of calling a service.
#[derive(Debug, Clone, Default)]
pub struct FixtureExtractor {
    invoices: Vec<ExtractedInvoice>,
}

impl FixtureExtractor {
    pub fn new(invoices: Vec<ExtractedInvoice>) -> Self {
        Self { invoices }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        load_fixture(path).map(Self::new)
    }
}

impl InvoiceExtractor for FixtureExtractor {
    async fn extract(&self, documents: &[Document]) -> Result<Vec<ExtractedInvoice>> {
        if !documents.is_empty() && documents.len() != self.invoices.len() {
            warn!(
                "Fixture has {} invoices but {} documents were given; documents are ignored",
                self.invoices.len(),
                documents.len()
            );
        }
        Ok(self.invoices.clone())
    }
}
