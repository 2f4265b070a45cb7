//! In-memory cache for upstream responses
//!
//! This module provides a time-bounded key/value cache with lazy expiry: an
//! entry older than its TTL is treated as absent and dropped the next time it
//! is read. Nothing is persisted, so a restart empties the cache. The clock is
//! injectable so expiry can be tested without waiting.

mod clock;
mod key;
mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;
pub use manager::{CacheManager, CachedData, DEFAULT_TTL_HOURS};
