//! Error types for the invex-core library.

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Invoice extraction error.
    #[error("extraction failure: {0}")]
    Extraction(#[from] ExtractionError),

    /// Forex rate lookup error.
    #[error("rate lookup error: {0}")]
    RateLookup(#[from] RateLookupError),

    /// An invoice date is not a valid `YYYY-MM-DD` date.
    #[error("malformed date {value:?} on invoice {invoice}")]
    MalformedDate { invoice: String, value: String },

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning documents into invoice records.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No text could be pulled out of the document.
    #[error("no text in document {0}")]
    EmptyDocument(String),

    /// The PDF could not be read.
    #[error("failed to read PDF {document}: {reason}")]
    Pdf { document: String, reason: String },

    /// The HTTP client could not be set up.
    #[error("failed to build extraction client: {0}")]
    Client(String),

    /// Transport-level failure talking to the extraction service.
    #[error("extraction request for {document} failed: {reason}")]
    Request { document: String, reason: String },

    /// The service answered with a non-success status.
    #[error("extraction service returned HTTP {status} for {document}: {body}")]
    Status {
        document: String,
        status: u16,
        body: String,
    },

    /// The service reply did not contain a usable invoice record.
    #[error("malformed extraction response for {document}: {reason}")]
    Malformed { document: String, reason: String },

    /// The fixture file could not be read or parsed.
    #[error("failed to load fixture {path}: {reason}")]
    Fixture { path: String, reason: String },
}

/// Errors raised by forex rate lookups.
#[derive(Error, Debug)]
pub enum RateLookupError {
    /// No API key was configured for the forex provider.
    #[error("no forex API key configured")]
    MissingApiKey,

    /// The request did not complete in time.
    #[error("forex request for {base}/{dest} timed out")]
    Timeout { base: String, dest: String },

    /// Transport-level failure.
    #[error("forex request failed: {0}")]
    Network(String),

    /// Non-success HTTP status (or a non-success `meta.code` in the body).
    #[error("forex provider returned status {status}")]
    Status { status: u16 },

    /// The response body is not the expected JSON document.
    #[error("malformed forex response: {0}")]
    Malformed(String),

    /// The response lacks a rate for the requested destination currency.
    #[error("no {dest} rate for {base} on {date}")]
    MissingRate {
        base: String,
        dest: String,
        date: String,
    },
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
