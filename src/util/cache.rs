//! Bounded TTL memory cache
//!
//! Caches expensive responses (AI enhancements) for a fixed time-to-live so
//! repeated identical requests within the window are served locally. Entries
//! past their TTL are treated as absent and pruned lazily; when full, the
//! entry closest to expiry is evicted.

use std::collections::HashMap;
use std::hash::Hash;

use tokio::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory TTL cache with a fixed capacity
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    /// Fetch a live entry; expired entries count as misses and are removed
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value, evicting expired entries first and then the entry
    /// closest to expiry if still at capacity
    pub fn insert(&mut self, key: K, value: V) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            let evict = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(k) = evict {
                self.entries.remove(&k);
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Number of entries currently held, including not-yet-pruned expired ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("k", 1);
        assert_eq!(cache.get(&"k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_after_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("k", 1);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"k"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_closest_to_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 1);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("b", 2);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_refreshes_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("k", 1);
        tokio::time::advance(Duration::from_secs(50)).await;
        cache.insert("k", 2);
        tokio::time::advance(Duration::from_secs(50)).await;
        assert_eq!(cache.get(&"k"), Some(2));
    }
}
