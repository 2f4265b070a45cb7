//! Cache-backed APOD proxy
//!
//! [`ApodService`] answers "give me the picture for date D". Fresh cache hits
//! are served without touching the upstream. Misses go to the upstream through
//! a per-key in-flight map, so concurrent misses for the same key share one
//! upstream call. Failures are never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration as StdDuration;

use chrono::Duration;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::cache::{CacheKey, CacheManager, Clock};
use crate::data::{ApodSource, PictureRecord, UpstreamError};

/// Default bound on a single upstream call
pub const DEFAULT_UPSTREAM_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Errors returned by [`ApodService::get_apod`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// The upstream call failed; nothing was cached
    #[error("Failed to fetch APOD data: {0}")]
    Upstream(#[from] UpstreamError),
}

type PictureCache = CacheManager<CacheKey, PictureRecord>;
type SharedFetch = Shared<BoxFuture<'static, Result<PictureRecord, UpstreamError>>>;
type InFlight = Mutex<HashMap<CacheKey, SharedFetch>>;

/// The proxy's single read operation and the state it owns
pub struct ApodService<S> {
    source: Arc<S>,
    cache: Arc<PictureCache>,
    in_flight: Arc<InFlight>,
    upstream_timeout: StdDuration,
}

impl<S: ApodSource> ApodService<S> {
    /// Creates a service with an empty cache on wall-clock time
    pub fn new(source: S, cache_ttl: Duration, upstream_timeout: StdDuration) -> Self {
        Self::with_cache(source, CacheManager::new(cache_ttl), upstream_timeout)
    }

    /// Creates a service whose cache runs on `clock`
    pub fn with_clock(
        source: S,
        cache_ttl: Duration,
        upstream_timeout: StdDuration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_cache(
            source,
            CacheManager::with_clock(cache_ttl, clock),
            upstream_timeout,
        )
    }

    fn with_cache(source: S, cache: PictureCache, upstream_timeout: StdDuration) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(cache),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            upstream_timeout,
        }
    }

    /// The upstream collaborator
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The picture cache
    pub fn cache(&self) -> &PictureCache {
        &self.cache
    }

    /// Number of upstream fetches currently pending
    pub fn in_flight_len(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Returns the picture for `date`, or today's when `date` is absent or empty
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without an upstream call
    /// - On a miss, joins a pending fetch for the same key or starts one
    /// - A successful fetch is cached under the key; a failed one is not
    pub async fn get_apod(&self, date: Option<&str>) -> Result<PictureRecord, ProxyError> {
        let key = CacheKey::for_date(date);

        if let Some(cached) = self.cache.read(&key) {
            debug!(key = %key, "cache hit");
            return Ok(cached.data);
        }

        let fetch = {
            let mut in_flight = lock(&self.in_flight);

            // A fetch may have completed between the read above and taking the lock.
            if let Some(cached) = self.cache.read(&key) {
                debug!(key = %key, "cache hit");
                return Ok(cached.data);
            }

            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(key = %key, "joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    debug!(key = %key, "cache miss, fetching upstream");
                    let fetch = self.start_fetch(key.clone());
                    in_flight.insert(key.clone(), fetch.clone());
                    fetch
                }
            }
        };

        fetch.await.map_err(|err| {
            error!(key = %key, error = %err, "failed to fetch APOD");
            ProxyError::Upstream(err)
        })
    }

    /// Spawns the upstream fetch for `key` and returns a shared handle to it
    ///
    /// The task stores its own result and clears its in-flight entry, so it
    /// runs to completion even if every waiter goes away. Must be called with
    /// the in-flight lock held, which keeps the removal ordered after the
    /// insert.
    fn start_fetch(&self, key: CacheKey) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let timeout = self.upstream_timeout;

        let task = tokio::spawn(async move {
            let result =
                match tokio::time::timeout(timeout, source.fetch_apod(key.upstream_date())).await {
                    Ok(result) => result,
                    Err(_) => Err(UpstreamError::Timeout),
                };

            if let Ok(record) = &result {
                info!(key = %key, date = %record.date, title = %record.title, "cached APOD");
                cache.write(key.clone(), record.clone());
            }
            lock(&in_flight).remove(&key);

            result
        });

        task.map(|joined| {
            joined.unwrap_or_else(|err| Err(UpstreamError::RequestFailed(err.to_string())))
        })
        .boxed()
        .shared()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
