//! Cache manager holding responses in memory
//!
//! Provides a `CacheManager` that stores values alongside their insertion time
//! and hands them back only while they are younger than the TTL.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::clock::{Clock, SystemClock};

/// Default time-to-live for cache entries in hours
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// A value together with its insertion timestamps
#[derive(Debug)]
struct CacheEntry<V> {
    /// The cached data
    data: V,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading a fresh entry from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<V> {
    /// The cached data
    pub data: V,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory cache with a single TTL for all entries
///
/// Expiry is lazy: an entry whose age has reached the TTL is never returned,
/// and is removed by the read that finds it. There is no background sweep.
pub struct CacheManager<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> fmt::Debug for CacheManager<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("ttl", &self.ttl)
            .field("entries", &self.lock().len())
            .finish()
    }
}

impl<K, V> Default for CacheManager<K, V> {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TTL_HOURS))
    }
}

impl<K, V> CacheManager<K, V> {
    /// Creates an empty cache using wall-clock time
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by a custom clock
    ///
    /// Useful for testing expiry without sleeping.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// How long entries stay fresh
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, including expired ones not yet read
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash, V: Clone> CacheManager<K, V> {
    /// Stores `data` under `key` with a fresh timestamp, replacing any previous entry
    pub fn write(&self, key: K, data: V) {
        let now = self.clock.now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + self.ttl,
        };
        self.lock().insert(key, entry);
    }

    /// Reads a fresh entry from the cache
    ///
    /// # Returns
    /// * `Some(CachedData<V>)` if the entry exists and is younger than the TTL
    /// * `None` if the entry is missing or expired; an expired entry is removed
    pub fn read(&self, key: &K) -> Option<CachedData<V>> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if now >= entry.expires_at {
            entries.remove(key);
            return None;
        }

        Some(CachedData {
            data: entry.data.clone(),
            cached_at: entry.cached_at,
            expires_at: entry.expires_at,
        })
    }

    /// Whether a fresh entry exists for `key`
    pub fn contains(&self, key: &K) -> bool {
        self.read(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, ManualClock};
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (CacheManager<CacheKey, TestData>, Arc<ManualClock>) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let cache = CacheManager::with_clock(Duration::hours(24), clock.clone());
        (cache, clock)
    }

    fn key(date: &str) -> CacheKey {
        CacheKey::Date(date.to_string())
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _clock) = create_test_cache();

        let result = cache.read(&key("2024-01-01"));

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_read_returns_fresh_data() {
        let (cache, clock) = create_test_cache();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache.write(key("2024-01-01"), data.clone());
        clock.advance(Duration::hours(23));

        let result = cache.read(&key("2024-01-01")).expect("Should read fresh cache");
        assert_eq!(result.data, data);
    }

    #[test]
    fn test_entry_expires_exactly_at_ttl() {
        let (cache, clock) = create_test_cache();
        cache.write(
            key("2024-01-01"),
            TestData {
                name: "expired".to_string(),
                value: 0,
            },
        );

        clock.advance(Duration::hours(24));

        assert!(cache.read(&key("2024-01-01")).is_none());
    }

    #[test]
    fn test_expired_entry_is_removed_on_read() {
        let (cache, clock) = create_test_cache();
        cache.write(
            key("2024-01-01"),
            TestData {
                name: "old".to_string(),
                value: 1,
            },
        );
        clock.advance(Duration::hours(25));

        assert_eq!(cache.len(), 1, "Expiry is lazy");
        assert!(cache.read(&key("2024-01-01")).is_none());
        assert!(cache.is_empty(), "Expired entry should be dropped by the read");
    }

    #[test]
    fn test_cached_at_and_expires_at_are_recorded() {
        let (cache, clock) = create_test_cache();
        let written_at = clock.now();

        cache.write(
            CacheKey::Today,
            TestData {
                name: "timestamp".to_string(),
                value: 999,
            },
        );

        let result = cache.read(&CacheKey::Today).expect("Should read cache");
        assert_eq!(result.cached_at, written_at);
        assert_eq!(result.expires_at, written_at + Duration::hours(24));
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let (cache, clock) = create_test_cache();
        let data1 = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let data2 = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.write(key("2024-01-01"), data1);
        clock.advance(Duration::hours(20));
        cache.write(key("2024-01-01"), data2.clone());
        clock.advance(Duration::hours(20));

        let result = cache.read(&key("2024-01-01")).expect("Should read cache");
        assert_eq!(result.data, data2, "Cache should contain latest data");
    }

    #[test]
    fn test_today_and_explicit_date_are_separate_entries() {
        let (cache, _clock) = create_test_cache();
        cache.write(
            CacheKey::Today,
            TestData {
                name: "today".to_string(),
                value: 1,
            },
        );

        assert!(cache.contains(&CacheKey::Today));
        assert!(!cache.contains(&key("2024-01-01")));
        assert!(!cache.contains(&key("today")));
    }

    #[test]
    fn test_default_ttl_is_24_hours() {
        let cache: CacheManager<CacheKey, TestData> = CacheManager::default();
        assert_eq!(cache.ttl(), Duration::hours(24));
        assert!(cache.is_empty());
    }
}
