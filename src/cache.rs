//! Byte-bounded LRU cache for resolved icons.
//!
//! The cache is the only shared mutable state in the resolver. All reads and
//! writes go through one mutex so the recency list and the size accounting
//! never disagree.

use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::icon::Icon;

const TARGET: &str = "icon_resolver::cache";

/// Hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheState {
    entries: LruCache<String, Icon>,
    size_bytes: usize,
}

/// In-memory icon cache bounded by the total size of the stored icon data.
///
/// Entries are never mutated after insertion. [`get`](Self::get) hands out
/// clones whose bytes share the cached buffer read-only.
pub struct IconCache {
    capacity_bytes: usize,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl IconCache {
    /// Creates an empty cache holding at most `capacity_bytes` of icon data.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                size_bytes: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Looks up an icon, marking it as most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<Icon> {
        let found = self.state.lock().entries.get(key).cloned();
        match found {
            Some(icon) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: TARGET, key, "cache hit");
                Some(icon)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: TARGET, key, "cache miss");
                None
            }
        }
    }

    /// Stores an icon, evicting least recently used entries until it fits.
    ///
    /// Replacing an existing key releases the old entry's size first. An icon
    /// larger than the whole capacity is not stored.
    pub fn put(&self, key: impl Into<String>, icon: Icon) {
        let key = key.into();
        let size = icon.len();

        if size > self.capacity_bytes {
            tracing::debug!(
                target: TARGET,
                key = %key,
                size,
                capacity = self.capacity_bytes,
                "icon larger than cache capacity, not stored"
            );
            return;
        }

        let mut state = self.state.lock();

        if let Some(old) = state.entries.pop(&key) {
            state.size_bytes -= old.len();
        }

        while state.size_bytes + size > self.capacity_bytes {
            let Some((evicted_key, evicted)) = state.entries.pop_lru() else {
                break;
            };
            state.size_bytes -= evicted.len();
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(target: TARGET, key = %evicted_key, size = evicted.len(), "evicted");
        }

        state.size_bytes += size;
        state.entries.put(key, icon);
    }

    /// Returns true if the key is cached, without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.size_bytes = 0;
    }

    /// Returns the number of cached icons.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total size of the cached icon data.
    pub fn size_bytes(&self) -> usize {
        self.state.lock().size_bytes
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconCache")
            .field("capacity_bytes", &self.capacity_bytes)
            .field("size_bytes", &self.size_bytes())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::{ColorMode, ContentType};

    fn icon_of_size(size: usize) -> Icon {
        Icon::new(vec![0u8; size], ContentType::Png, ColorMode::Mask)
    }

    #[test]
    fn get_and_put() {
        let cache = IconCache::new(100);
        assert!(cache.get("a").is_none());

        cache.put("a", icon_of_size(10));
        assert_eq!(cache.get("a").unwrap().len(), 10);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.size_bytes(), 10);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, evictions: 0 });
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = IconCache::new(100);
        cache.put("a", icon_of_size(40));
        cache.put("b", icon_of_size(40));

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());

        cache.put("c", icon_of_size(40));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.size_bytes(), 80);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn evicts_until_it_fits() {
        let cache = IconCache::new(100);
        cache.put("a", icon_of_size(30));
        cache.put("b", icon_of_size(30));
        cache.put("c", icon_of_size(30));

        cache.put("d", icon_of_size(70));
        assert!(!cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
        assert_eq!(cache.size_bytes(), 100);
    }

    #[test]
    fn replacing_releases_old_size() {
        let cache = IconCache::new(100);
        cache.put("a", icon_of_size(60));
        cache.put("a", icon_of_size(20));
        assert_eq!(cache.size_bytes(), 20);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn oversized_icon_is_not_stored() {
        let cache = IconCache::new(10);
        cache.put("a", icon_of_size(5));
        cache.put("big", icon_of_size(11));
        assert!(!cache.contains("big"));
        assert!(cache.contains("a"));
    }

    #[test]
    fn clear_resets_size() {
        let cache = IconCache::new(100);
        cache.put("a", icon_of_size(10));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.size_bytes(), 0);
    }
}
