//! TTL cache for resolved destinations.
//!
//! A process-wide `domain -> (destination, timestamp)` store shared by all
//! in-flight requests. Entries expire on read: a stale entry is removed the
//! next time its key is looked up. The cache is constructed once at startup
//! and handed to the engine behind an `Arc`, never accessed through an
//! implicit global.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::config::CACHE_TTL_SECS;

/// A single cached destination.
///
/// `value` is always a validated destination hostname: never empty, never an
/// IP literal. Entries are immutable once constructed; re-resolution replaces
/// the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Validated destination hostname.
    pub value: String,
    /// When this entry was stored.
    pub timestamp: Instant,
}

/// Shared TTL cache mapping lookup domains to resolved destinations.
///
/// Safe for concurrent `get`/`put`/`lookup` from arbitrarily many tasks.
/// Lost updates on the same key are acceptable (last writer wins) since
/// entries are idempotently re-derivable from DNS.
#[derive(Debug)]
pub struct DnsCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsCache {
    /// Creates a cache with the default TTL (one hour).
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(CACHE_TTL_SECS))
    }

    /// Creates a cache with a custom TTL. Used by tests and TTL overrides.
    pub fn with_ttl(ttl: Duration) -> Self {
        DnsCache {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the raw entry for a key, fresh or stale.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .read()
            .expect("dns cache lock poisoned")
            .get(key)
            .cloned()
    }

    /// Checks whether an entry is still within its TTL.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.timestamp.elapsed() < self.ttl
    }

    /// Returns the cached destination for a key if present and fresh.
    ///
    /// A stale entry is evicted and treated as absent; the caller re-resolves
    /// and overwrites it via [`DnsCache::put`].
    pub fn lookup(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(entry) if self.is_fresh(&entry) => Some(entry.value),
            Some(_) => {
                log::debug!("evicting stale cache entry for {key}");
                self.entries
                    .write()
                    .expect("dns cache lock poisoned")
                    .remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserts or overwrites a destination with the current timestamp.
    pub fn put(&self, key: &str, value: &str) {
        let entry = CacheEntry {
            value: value.to_string(),
            timestamp: Instant::now(),
        };
        self.entries
            .write()
            .expect("dns cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    /// Number of entries currently stored, including stale ones.
    pub fn len(&self) -> usize {
        self.entries.read().expect("dns cache lock poisoned").len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries. Used by tests.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("dns cache lock poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_fresh_entry() {
        let cache = DnsCache::new();
        cache.put("example.com", "target.com");
        assert_eq!(cache.lookup("example.com"), Some("target.com".to_string()));
    }

    #[test]
    fn test_lookup_absent_key() {
        let cache = DnsCache::new();
        assert_eq!(cache.lookup("example.com"), None);
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let cache = DnsCache::new();
        cache.put("example.com", "old.com");
        cache.put("example.com", "new.com");
        assert_eq!(cache.lookup("example.com"), Some("new.com".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stale_entry_is_evicted_on_lookup() {
        let cache = DnsCache::with_ttl(Duration::from_millis(20));
        cache.put("example.com", "target.com");
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(cache.lookup("example.com"), None);
        // Eviction is physical, not just logical
        assert!(cache.get("example.com").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_is_fresh_respects_ttl() {
        let cache = DnsCache::with_ttl(Duration::from_millis(20));
        cache.put("example.com", "target.com");
        let entry = cache.get("example.com").expect("entry present");
        assert!(cache.is_fresh(&entry));

        std::thread::sleep(Duration::from_millis(40));
        assert!(!cache.is_fresh(&entry));
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = DnsCache::new();
        cache.put("a.com", "x.com");
        cache.put("b.com", "y.com");
        assert_eq!(cache.lookup("a.com"), Some("x.com".to_string()));
        assert_eq!(cache.lookup("b.com"), Some("y.com".to_string()));
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;

        let cache = Arc::new(DnsCache::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("host-{}.example.com", j % 10);
                    cache.put(&key, &format!("target-{i}.com"));
                    let _ = cache.lookup(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker thread panicked");
        }
        assert_eq!(cache.len(), 10);
    }
}
