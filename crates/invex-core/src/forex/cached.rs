//! Caching wrapper around any rate provider.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::debug;

use super::{RateKey, RateProvider, Result};
use crate::cache::ExpiringCache;
use crate::models::config::ForexConfig;

/// Rate provider that remembers answers of `inner` for a limited time.
///
/// Two concurrent misses on the same key both reach `inner`; the later
/// answer wins.
pub struct CachedRates<P> {
    inner: P,
    cache: Mutex<ExpiringCache<RateKey, f64>>,
}

impl<P> CachedRates<P> {
    pub fn new(inner: P, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(ExpiringCache::new(capacity, ttl)),
        }
    }

    /// Wrap `inner` with the cache limits from the forex configuration.
    pub fn from_config(inner: P, config: &ForexConfig) -> Self {
        Self::new(
            inner,
            config.cache_capacity,
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn cache(&self) -> MutexGuard<'_, ExpiringCache<RateKey, f64>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: RateProvider> RateProvider for CachedRates<P> {
    async fn rate(&self, base: &str, dest: &str, date: NaiveDate) -> Result<f64> {
        let key = RateKey::new(base, dest, date);

        let cached = self.cache().get(&key);
        if let Some(rate) = cached {
            debug!("Cached {}/{} rate for {}: {}", base, dest, date, rate);
            return Ok(rate);
        }

        let rate = self.inner.rate(base, dest, date).await?;
        self.cache().insert(key, rate);
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RateLookupError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider answering a fixed rate and counting its calls.
    struct CountingRates {
        rate: f64,
        calls: AtomicUsize,
    }

    impl CountingRates {
        fn new(rate: f64) -> Self {
            Self {
                rate,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RateProvider for CountingRates {
        async fn rate(&self, _base: &str, _dest: &str, _date: NaiveDate) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rate)
        }
    }

    struct FailingRates;

    impl RateProvider for FailingRates {
        async fn rate(&self, _base: &str, _dest: &str, _date: NaiveDate) -> Result<f64> {
            Err(RateLookupError::Status { status: 429 })
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_same_key_fetched_once() {
        let rates = CachedRates::new(CountingRates::new(23.5), 16, Duration::from_secs(600));

        assert_eq!(rates.rate("USD", "CZK", day(15)).await.unwrap(), 23.5);
        assert_eq!(rates.rate("USD", "CZK", day(15)).await.unwrap(), 23.5);
        assert_eq!(rates.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetched_separately() {
        let rates = CachedRates::new(CountingRates::new(24.0), 16, Duration::from_secs(600));

        rates.rate("EUR", "CZK", day(15)).await.unwrap();
        rates.rate("EUR", "CZK", day(16)).await.unwrap();
        rates.rate("USD", "CZK", day(16)).await.unwrap();
        assert_eq!(rates.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_fetches() {
        let rates = CachedRates::new(CountingRates::new(24.0), 16, Duration::ZERO);

        rates.rate("EUR", "CZK", day(15)).await.unwrap();
        rates.rate("EUR", "CZK", day(15)).await.unwrap();
        assert_eq!(rates.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let rates = CachedRates::new(FailingRates, 16, Duration::from_secs(600));

        let err = rates.rate("USD", "CZK", day(15)).await.unwrap_err();
        assert!(matches!(err, RateLookupError::Status { status: 429 }));
        assert!(rates.cache().is_empty());
    }
}
