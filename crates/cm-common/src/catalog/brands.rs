use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::Car;

pub const DEFAULT_BRAND_CACHE_TTL_SECS: i64 = 3600;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandCacheConfig {
    pub ttl: Duration,
}

impl Default for BrandCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(DEFAULT_BRAND_CACHE_TTL_SECS),
        }
    }
}

impl BrandCacheConfig {
    /// Reads `CM_BRAND_CACHE_TTL_SECS`; unset or invalid values use the default.
    pub fn from_env() -> Self {
        Self::from_ttl_value(std::env::var("CM_BRAND_CACHE_TTL_SECS").ok().as_deref())
    }

    fn from_ttl_value(value: Option<&str>) -> Self {
        let ttl_secs = value
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|secs| *secs >= 0)
            .unwrap_or(DEFAULT_BRAND_CACHE_TTL_SECS);
        Self::with_ttl_secs(ttl_secs)
    }

    /// Negative values clamp to 0, which disables caching. Values too large
    /// for a `Duration` use the default.
    pub fn with_ttl_secs(secs: i64) -> Self {
        let ttl = Duration::try_seconds(secs.max(0))
            .unwrap_or_else(|| Duration::seconds(DEFAULT_BRAND_CACHE_TTL_SECS));
        Self { ttl }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrandCacheError {
    #[error("brand list refresh failed: {0}")]
    Refresh(String),
}

#[derive(Debug, Clone)]
struct Entry {
    brands: Vec<String>,
    fetched_at: DateTime<Utc>,
}

/// Brand list cache with an explicit TTL and an injected clock.
///
/// Owned by whoever serves the brand list; nothing here is global.
pub struct BrandCache<C: Clock = SystemClock> {
    clock: C,
    config: BrandCacheConfig,
    entry: Option<Entry>,
}

impl BrandCache<SystemClock> {
    pub fn new(config: BrandCacheConfig) -> Self {
        Self::with_clock(SystemClock, config)
    }
}

impl<C: Clock> BrandCache<C> {
    pub fn with_clock(clock: C, config: BrandCacheConfig) -> Self {
        Self {
            clock,
            config,
            entry: None,
        }
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.clock.now() - entry.fetched_at < self.config.ttl
    }

    /// Cached brands while fresh, otherwise whatever `loader` returns.
    ///
    /// A failed refresh leaves the previous entry in place and returns the
    /// error.
    pub fn get_or_refresh<F, E>(&mut self, loader: F) -> Result<Vec<String>, BrandCacheError>
    where
        F: FnOnce() -> Result<Vec<String>, E>,
        E: std::fmt::Display,
    {
        if let Some(entry) = self.entry.as_ref().filter(|entry| self.is_fresh(entry)) {
            debug!(brands = entry.brands.len(), "brand cache hit");
            return Ok(entry.brands.clone());
        }

        match loader() {
            Ok(brands) => {
                self.entry = Some(Entry {
                    brands: brands.clone(),
                    fetched_at: self.clock.now(),
                });
                Ok(brands)
            }
            Err(err) => {
                warn!(error = %err, stale = self.entry.is_some(), "brand cache refresh failed");
                Err(BrandCacheError::Refresh(err.to_string()))
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Sorted, deduplicated brand names of a catalog.
pub fn distinct_brands<'a, I>(cars: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Car>,
{
    cars.into_iter()
        .map(|car| car.brand.trim().to_string())
        .filter(|brand| !brand.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{car, raw};
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn cache(clock: &ManualClock) -> BrandCache<ManualClock> {
        BrandCache::with_clock(
            clock.clone(),
            BrandCacheConfig {
                ttl: Duration::seconds(60),
            },
        )
    }

    fn brands(names: &[&str]) -> Result<Vec<String>, String> {
        Ok(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn serves_cached_brands_until_ttl_expires() {
        let clock = ManualClock::new();
        let mut cache = cache(&clock);

        assert_eq!(cache.get_or_refresh(|| brands(&["Fiat"])).unwrap(), vec!["Fiat"]);

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get_or_refresh(|| brands(&["Honda"])).unwrap(), vec!["Fiat"]);

        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get_or_refresh(|| brands(&["Honda"])).unwrap(), vec!["Honda"]);
    }

    #[test]
    fn failed_refresh_keeps_stale_entry_and_reports() {
        let clock = ManualClock::new();
        let mut cache = cache(&clock);
        cache.get_or_refresh(|| brands(&["Fiat"])).unwrap();

        clock.advance(Duration::seconds(120));
        let err = cache
            .get_or_refresh(|| Err::<Vec<String>, _>("upstream down"))
            .unwrap_err();
        assert_eq!(err.to_string(), "brand list refresh failed: upstream down");
        assert!(cache.entry.is_some());
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let clock = ManualClock::new();
        let mut cache = cache(&clock);
        cache.get_or_refresh(|| brands(&["Fiat"])).unwrap();

        cache.invalidate();
        assert_eq!(cache.get_or_refresh(|| brands(&["Toyota"])).unwrap(), vec!["Toyota"]);
    }

    #[test]
    fn ttl_values_fall_back_to_the_default() {
        let default = Duration::seconds(DEFAULT_BRAND_CACHE_TTL_SECS);
        assert_eq!(BrandCacheConfig::from_ttl_value(Some(" 90 ")).ttl, Duration::seconds(90));
        assert_eq!(BrandCacheConfig::from_ttl_value(Some("-5")).ttl, default);
        assert_eq!(BrandCacheConfig::from_ttl_value(Some("soon")).ttl, default);
        assert_eq!(BrandCacheConfig::from_ttl_value(None).ttl, default);
        assert_eq!(BrandCacheConfig::with_ttl_secs(-1).ttl, Duration::zero());
    }

    #[test]
    fn oversized_ttl_values_use_the_default() {
        let default = Duration::seconds(DEFAULT_BRAND_CACHE_TTL_SECS);
        assert_eq!(
            BrandCacheConfig::from_ttl_value(Some("9223372036854775807")).ttl,
            default
        );
        assert_eq!(BrandCacheConfig::with_ttl_secs(i64::MAX).ttl, default);
        assert_eq!(
            BrandCacheConfig::with_ttl_secs(i64::MAX / 1000).ttl,
            Duration::seconds(i64::MAX / 1000)
        );
    }

    #[test]
    fn distinct_brands_are_sorted_and_unique() {
        let cars = vec![
            car("a", "Volkswagen", "Polo", 1.0, 2024, raw(300.0, 2.5, 150.0, 12.0)),
            car("b", "Fiat", "Pulse", 1.0, 2024, raw(370.0, 2.5, 190.0, 11.0)),
            car("c", "Volkswagen ", "Nivus", 1.0, 2024, raw(415.0, 2.5, 180.0, 11.0)),
        ];

        assert_eq!(distinct_brands(&cars), vec!["Fiat", "Volkswagen"]);
    }
}
