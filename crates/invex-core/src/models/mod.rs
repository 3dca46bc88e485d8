//! Data models: extracted invoices, accounting rows and configuration.

pub mod config;
pub mod invoice;
pub mod row;
