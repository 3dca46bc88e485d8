//! Core library for Stereo accounting invoice imports.
//!
//! This crate provides:
//! - Invoice records as returned by an extraction service
//! - Normalization into numbered accounting rows with currency conversion
//! - Historical forex lookups with a small expiring cache
//! - Semicolon-delimited CSV export with Czech decimal formatting

pub mod cache;
pub mod error;
pub mod export;
pub mod extract;
pub mod forex;
pub mod models;
pub mod normalize;

pub use cache::ExpiringCache;
pub use error::{ExtractionError, InvexError, RateLookupError, Result};
pub use export::{Column, CsvExporter};
pub use extract::{Document, FixtureExtractor, InvoiceExtractor, OpenAiExtractor};
pub use forex::{CachedRates, CurrencyScoop, RateProvider};
pub use models::config::InvexConfig;
pub use models::invoice::ExtractedInvoice;
pub use models::row::{AccountingRow, ExchangeRate};
pub use normalize::Normalizer;
