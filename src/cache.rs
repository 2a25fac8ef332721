//! Content-addressed cache of detection results.
//!
//! Detection over a long book is the expensive step, and callers (a UI
//! re-rendering, overlapping requests for the same upload) tend to ask for
//! the same document again. Results are keyed by a fingerprint of the full
//! content and bounded two ways:
//!
//! 1. entries older than the expiration window are dropped
//! 2. while the entry count exceeds capacity, the oldest entry is dropped
//!
//! Both passes run at the start of every `get` and at the end of every `put`,
//! against a single clock reading per call.
//!
//! Fingerprints are 64-bit xxh3 hashes. Two documents that collide share an
//! entry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use xxhash_rust::xxh3::xxh3_64;

use crate::{CacheConfig, Chapter};

/// Deterministic fingerprint of document content.
///
/// ```rust
/// use chapterize::fingerprint;
///
/// assert_eq!(fingerprint("abc"), fingerprint("abc"));
/// assert_ne!(fingerprint("abc"), fingerprint("acb"));
/// assert_eq!(fingerprint("abc").len(), 16);
/// ```
#[must_use]
pub fn fingerprint(content: &str) -> String {
    format!("{:016x}", xxh3_64(content.as_bytes()))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    chapters: Vec<Chapter>,
    created_at: Instant,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Thread-safe, bounded cache from document content to detected chapters.
///
/// Share it between segmenters with an `Arc`; every operation takes the
/// internal lock for its whole duration.
///
/// ```rust
/// use chapterize::{ChapterCache, Chapter, CacheConfig};
///
/// let cache = ChapterCache::new(CacheConfig::default());
/// let chapters = vec![Chapter::new(1, "Intro", "body", 1.0)];
///
/// cache.put("document", chapters.clone());
/// assert_eq!(cache.get("document"), Some(chapters));
/// assert_eq!(cache.get("other"), None);
/// ```
#[derive(Debug)]
pub struct ChapterCache {
    config: CacheConfig,
    inner: Mutex<Inner>,
}

impl ChapterCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// The bounds this cache enforces.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up the chapters cached for `content`.
    #[must_use]
    pub fn get(&self, content: &str) -> Option<Vec<Chapter>> {
        self.get_at(content, Instant::now())
    }

    /// Cache `chapters` for `content`, replacing any previous entry.
    pub fn put(&self, content: &str, chapters: Vec<Chapter>) {
        self.put_at(content, chapters, Instant::now());
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of live entries (expired entries may linger until the next
    /// `get` or `put`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookup counters since creation.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    pub(crate) fn get_at(&self, content: &str, now: Instant) -> Option<Vec<Chapter>> {
        let key = fingerprint(content);
        let mut inner = self.lock();
        self.evict(&mut inner, now);

        let found = inner.entries.get(&key).map(|e| e.chapters.clone());
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    pub(crate) fn put_at(&self, content: &str, chapters: Vec<Chapter>, now: Instant) {
        let key = fingerprint(content);
        let mut inner = self.lock();
        inner.entries.insert(
            key,
            CacheEntry {
                chapters,
                created_at: now,
            },
        );
        self.evict(&mut inner, now);
    }

    fn evict(&self, inner: &mut Inner, now: Instant) {
        let before = inner.entries.len();
        let expiration = self.config.expiration();
        inner
            .entries
            .retain(|_, e| now.saturating_duration_since(e.created_at) <= expiration);
        let expired = before - inner.entries.len();

        let mut evicted = 0;
        while inner.entries.len() > self.config.capacity() {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            let Some(key) = oldest else {
                break;
            };
            inner.entries.remove(&key);
            evicted += 1;
        }

        if expired + evicted > 0 {
            tracing::debug!(expired, evicted, remaining = inner.entries.len(), "cache eviction");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChapterCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn chapters(tag: &str) -> Vec<Chapter> {
        vec![Chapter::new(1, tag, "body", 1.0)]
    }

    fn small(capacity: usize) -> ChapterCache {
        ChapterCache::new(CacheConfig::default().with_capacity(capacity).unwrap())
    }

    #[test]
    fn test_put_then_get() {
        let cache = ChapterCache::default();
        assert_eq!(cache.config(), &CacheConfig::default());
        cache.put("doc", chapters("a"));
        assert_eq!(cache.get("doc"), Some(chapters("a")));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 0 });
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ChapterCache::default();
        cache.put("doc", chapters("a"));
        cache.put("doc", chapters("b"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("doc"), Some(chapters("b")));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = small(3);
        let start = Instant::now();
        for i in 0..4u64 {
            cache.put_at(&format!("doc{i}"), chapters("x"), start + Duration::from_secs(i));
        }
        assert_eq!(cache.len(), 3);

        let now = start + Duration::from_secs(4);
        assert_eq!(cache.get_at("doc0", now), None);
        for i in 1..4 {
            assert!(cache.get_at(&format!("doc{i}"), now).is_some());
        }
    }

    #[test]
    fn test_expired_entries_dropped_on_get() {
        let cache = ChapterCache::new(
            CacheConfig::default().with_expiration(Duration::from_secs(60)),
        );
        let start = Instant::now();
        cache.put_at("old", chapters("a"), start);
        cache.put_at("new", chapters("b"), start + Duration::from_secs(50));

        let later = start + Duration::from_secs(90);
        assert_eq!(cache.get_at("old", later), None);
        assert!(cache.get_at("new", later).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_at_exact_expiration_survives() {
        let cache = ChapterCache::new(
            CacheConfig::default().with_expiration(Duration::from_secs(60)),
        );
        let start = Instant::now();
        cache.put_at("doc", chapters("a"), start);
        assert!(cache.get_at("doc", start + Duration::from_secs(60)).is_some());
    }

    #[test]
    fn test_clear() {
        let cache = ChapterCache::default();
        cache.put("a", chapters("a"));
        cache.put("b", chapters("b"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_copy_on_read() {
        let cache = ChapterCache::default();
        cache.put("doc", chapters("a"));
        let mut read = cache.get("doc").unwrap();
        read[0].title.push_str(" edited");
        assert_eq!(cache.get("doc"), Some(chapters("a")));
    }
}
