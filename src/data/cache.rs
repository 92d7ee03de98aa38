//! Run-scoped, time-bounded memo tables.
//!
//! Entries are never evicted on expiry; an expired entry simply reads as
//! absent until the next successful write replaces it.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::domain::{DashboardView, RawSample};

/// How long a cached payload stays valid.
pub const CACHE_DURATION: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct Stamped<V> {
    value: V,
    stored_at: Instant,
}

/// A map whose entries are only visible for `ttl` after they were written.
#[derive(Debug, Clone)]
pub struct TimedCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Stamped<V>>,
}

impl<K: Eq + Hash, V: Clone> TimedCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Copy of the entry for `key` if it is still fresh at `now`.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let entry = self.entries.get(key)?;
        let age = now.saturating_duration_since(entry.stored_at);
        (age < self.ttl).then(|| entry.value.clone())
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, Stamped { value, stored_at: now });
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(indicator code, year)`
pub type SeriesKey = (String, i32);
/// `(indicator code, year count)`
pub type ViewKey = (String, u32);

/// The two tables shared by the fetch client and the pipeline.
#[derive(Debug, Clone)]
pub struct DataCache {
    /// Raw per-year series.
    pub series: TimedCache<SeriesKey, Vec<RawSample>>,
    /// Composed chart payloads.
    pub views: TimedCache<ViewKey, DashboardView>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_DURATION)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            series: TimedCache::new(ttl),
            views: TimedCache::new(ttl),
        }
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.views.clear();
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedCache = Arc<Mutex<DataCache>>;

pub fn shared_cache() -> SharedCache {
    Arc::new(Mutex::new(DataCache::new()))
}

/// Lock the shared cache. A poisoned lock still holds consistent maps, so it is recovered.
pub fn lock(cache: &SharedCache) -> MutexGuard<'_, DataCache> {
    cache.lock().unwrap_or_else(|e| e.into_inner())
}
