//! Bounded HTTP response cache
//!
//! When caching is enabled, a fresh-enough prior response for the same
//! canonical URL is served instead of a new round trip. Entries age out of
//! the freshness window and the least-recently-used ones are evicted when
//! the cache is full.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::page::Page;
use crate::utils::constants::{CACHE_CAPACITY, CACHE_FRESHNESS};

#[derive(Debug)]
struct CachedResponse {
    page: Page,
    stored_at: Instant,
}

/// LRU cache of fetched pages keyed by canonical URL
#[derive(Debug)]
pub struct ResponseCache {
    entries: LruCache<String, CachedResponse>,
    freshness: Duration,
}

impl ResponseCache {
    #[must_use]
    pub fn new(capacity: usize, freshness: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            freshness,
        }
    }

    /// Look up a fresh response; stale entries are evicted on access
    pub fn get(&mut self, key: &str) -> Option<Page> {
        let fresh = match self.entries.get(key) {
            Some(entry) => entry.stored_at.elapsed() <= self.freshness,
            None => return None,
        };
        if fresh {
            self.entries.get(key).map(|e| e.page.clone())
        } else {
            self.entries.pop(key);
            None
        }
    }

    /// Store a successful response
    pub fn put(&mut self, key: String, page: Page) {
        self.entries.put(
            key,
            CachedResponse {
                page,
                stored_at: Instant::now(),
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY, CACHE_FRESHNESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str) -> Page {
        Page {
            url: url.into(),
            content: "cached".into(),
            status_code: 200,
            ..Default::default()
        }
    }

    #[test]
    fn fresh_entry_is_served() {
        let mut cache = ResponseCache::default();
        cache.put("https://example.com/".into(), page("https://example.com/"));
        assert!(cache.get("https://example.com/").is_some());
    }

    #[test]
    fn stale_entry_is_evicted() {
        let mut cache = ResponseCache::new(8, Duration::ZERO);
        cache.put("https://example.com/".into(), page("https://example.com/"));
        assert!(cache.get("https://example.com/").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache = ResponseCache::new(1, Duration::from_secs(60));
        cache.put("a".into(), page("a"));
        cache.put("b".into(), page("b"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }
}
