//! Invoice extraction from source documents.

mod fixture;
mod openai;

pub use fixture::{FixtureExtractor, load_fixture, save_fixture};
pub use openai::{OpenAiExtractor, document_text, invoice_schema, parse_completion};

use std::path::Path;

use crate::error::ExtractionError;
use crate::models::invoice::ExtractedInvoice;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A source document handed to an extractor.
#[derive(Debug, Clone)]
pub struct Document {
    /// Display name, usually the file path.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(path.display().to_string(), bytes))
    }
}

/// Trait for services turning documents into invoice records.
///
/// Implementations return exactly one record per document, in input order,
/// or fail as a whole.
#[allow(async_fn_in_trait)]
pub trait InvoiceExtractor {
    async fn extract(&self, documents: &[Document]) -> Result<Vec<ExtractedInvoice>>;
}
