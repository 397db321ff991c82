//! Short-TTL response cache for catalog reads.
//!
//! Keys are derived deterministically from the listing filters, so two
//! requests with identical filters share an entry. A hit requires the entry
//! to be younger than the TTL; stale entries are not returned but linger
//! until an insert sweeps them out. Because this process is long-lived the
//! map is bounded: once it outgrows its capacity an insert first drops
//! stale entries and then, if needed, the oldest live one. Races are
//! benign — a duplicate fill just overwrites an identical value.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use serde_json::Value;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    inserted_at: Instant,
}

/// Shared in-process response cache. Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the cached value if a `set` for this key happened within the
    /// TTL window.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() <= self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store a value under the key, evicting as needed to stay within
    /// capacity.
    pub async fn set(&self, key: &str, value: Value) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );

        if entries.len() > self.capacity {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.inserted_at.elapsed() <= ttl);
        }
        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => entries.remove(&key),
                None => break,
            };
        }
    }

    /// Drop every entry whose key starts with the prefix. Used by product
    /// writes to invalidate all cached listings at once.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().await;
        entries.retain(|key, _| !key.starts_with(prefix));
    }

    /// Number of physically present entries, live or stale.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn get_hits_only_within_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(40), 16);
        cache.set("products:all", json!([1, 2, 3])).await;
        assert_eq!(cache.get("products:all").await, Some(json!([1, 2, 3])));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            cache.get("products:all").await,
            None,
            "stale entries must miss"
        );
        // The stale entry is still physically present until an insert sweeps it.
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_key_misses() {
        let cache = ResponseCache::new(Duration::from_secs(60), 16);
        assert!(cache.get("products:none").await.is_none());
    }

    #[tokio::test]
    async fn overwrite_refreshes_the_entry() {
        let cache = ResponseCache::new(Duration::from_millis(40), 16);
        cache.set("k", json!("old")).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.set("k", json!("new")).await;
        assert_eq!(cache.get("k").await, Some(json!("new")));
    }

    #[tokio::test]
    async fn prefix_invalidation_spares_other_keys() {
        let cache = ResponseCache::new(Duration::from_secs(60), 16);
        cache.set("products:a", json!(1)).await;
        cache.set("products:b", json!(2)).await;
        cache.set("offers:all", json!(3)).await;

        cache.invalidate_prefix("products:").await;
        assert!(cache.get("products:a").await.is_none());
        assert!(cache.get("products:b").await.is_none());
        assert_eq!(cache.get("offers:all").await, Some(json!(3)));
    }

    #[tokio::test]
    async fn growth_is_bounded_by_capacity() {
        let cache = ResponseCache::new(Duration::from_secs(60), 8);
        for i in 0..100 {
            cache.set(&format!("products:{i}"), json!(i)).await;
        }
        assert!(
            cache.len().await <= 8,
            "cache must not grow past its capacity"
        );
        // The most recent insert always survives eviction.
        assert_eq!(cache.get("products:99").await, Some(json!(99)));
    }

    #[tokio::test]
    async fn eviction_prefers_stale_entries() {
        let cache = ResponseCache::new(Duration::from_millis(30), 2);
        cache.set("old:1", json!(1)).await;
        cache.set("old:2", json!(2)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        cache.set("fresh:1", json!(3)).await;
        assert_eq!(cache.get("fresh:1").await, Some(json!(3)));
        assert!(cache.len().await <= 2);
    }
}
