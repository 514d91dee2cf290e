//! Process-lifetime TTL caches
//!
//! Simple key -> {value, inserted_at} maps with staleness checked lazily on
//! read. There is no background eviction and no single-flight de-duplication:
//! concurrent misses on the same key may both recompute, which is acceptable
//! because recomputation is idempotent and side-effect-free.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source, injectable so tests can simulate expiry deterministically
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for tests
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// A TTL cache with an injectable clock
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache backed by the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Look up a key, lazily evicting it if the entry has outlived the TTL
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        match entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace a value, stamping it with the current time
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let inserted_at = self.clock.now();
        entries.insert(
            key,
            Entry {
                value,
                inserted_at,
            },
        );
    }

    /// Number of live and stale entries currently held
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_before_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<String, u32> =
            TtlCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.insert("key".to_string(), 42);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"key".to_string()), Some(42));
    }

    #[test]
    fn test_miss_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<String, u32> =
            TtlCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.insert("key".to_string(), 42);
        clock.advance(Duration::from_secs(61));
        assert_eq!(cache.get(&"key".to_string()), None);
        // Stale entry was evicted on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_refreshes_timestamp() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<String, u32> =
            TtlCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.insert("key".to_string(), 1);
        clock.advance(Duration::from_secs(45));
        cache.insert("key".to_string(), 2);
        clock.advance(Duration::from_secs(45));
        // 90s after the first insert, but only 45s after the refresh
        assert_eq!(cache.get(&"key".to_string()), Some(2));
    }
}
