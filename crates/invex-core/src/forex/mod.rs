//! Historical exchange rate lookups.

mod cached;
mod currencyscoop;

pub use cached::CachedRates;
pub use currencyscoop::{CurrencyScoop, parse_rate_response};

use chrono::NaiveDate;

use crate::error::RateLookupError;

/// Result type for rate lookups.
pub type Result<T> = std::result::Result<T, RateLookupError>;

/// Source of historical daily exchange rates.
///
/// `rate(base, dest, date)` is the price of one unit of `base` in `dest`
/// on `date`. Currency codes are upper-case three-letter codes.
#[allow(async_fn_in_trait)]
pub trait RateProvider {
    async fn rate(&self, base: &str, dest: &str, date: NaiveDate) -> Result<f64>;
}

/// Cache key of a single lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub base: String,
    pub dest: String,
    pub date: NaiveDate,
}

impl RateKey {
    pub fn new(base: &str, dest: &str, date: NaiveDate) -> Self {
        Self {
            base: base.to_string(),
            dest: dest.to_string(),
            date,
        }
    }
}
