use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::domain::property::Property;
use crate::ports::cache::PropertyCache;

const FALLBACK_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

struct CacheEntry {
    property: Property,
    /// `None` when the TTL is too large to represent; the entry never expires.
    expires_at: Option<Instant>,
}

/// In-process LRU of property snapshots with a per-entry TTL.
pub struct MemoryCache {
    inner: RwLock<LruCache<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or_else(|| {
            tracing::warn!("Cache max_entries was 0, defaulting to {FALLBACK_CAPACITY}");
            FALLBACK_CAPACITY
        });
        Self {
            inner: RwLock::new(LruCache::new(cap)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyCache for MemoryCache {
    fn get(&self, id: &str) -> Option<Property> {
        let mut cache = self.inner.write().map_or_else(
            |_| {
                tracing::error!("Property cache lock poisoned on get('{id}'), returning miss");
                None
            },
            Some,
        )?;
        let entry = cache.get(id)?;
        if entry.expires_at.is_some_and(|at| Instant::now() > at) {
            cache.pop(id);
            return None;
        }
        Some(entry.property.clone())
    }

    fn put(&self, property: &Property, ttl: Duration) {
        if let Ok(mut cache) = self.inner.write() {
            cache.put(
                property.id.clone(),
                CacheEntry {
                    property: property.clone(),
                    expires_at: Instant::now().checked_add(ttl),
                },
            );
        } else {
            tracing::error!(
                "Property cache lock poisoned on put('{}'), skipping write",
                property.id
            );
        }
    }

    fn evict(&self, id: &str) {
        if let Ok(mut cache) = self.inner.write() {
            cache.pop(id);
        }
    }
}
