//! Short-lived cache of authenticated clients
//!
//! Entries are keyed by cluster id and tagged with the credential fingerprint
//! they were built from. A lookup with a different fingerprint misses, so an
//! edited cluster record never reuses a stale client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::ClientCacheConfig;

struct Entry<V> {
    value: V,
    fingerprint: u64,
    inserted_at: Instant,
}

/// TTL-bounded map from cluster id to client
#[derive(Clone)]
pub struct ClientCache<V: Clone> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> ClientCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Cache from config, `None` when caching is disabled
    pub fn from_config(config: &ClientCacheConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(Duration::from_secs(config.ttl_secs), config.max_entries))
    }

    /// Fresh value for `key` built from the same credentials
    pub async fn get(&self, key: &str, fingerprint: u64) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fingerprint == fingerprint && entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: impl Into<String>, fingerprint: u64, value: V) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

        let key = key.into();
        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                fingerprint,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fingerprint_mismatch_misses() {
        let cache = ClientCache::new(Duration::from_secs(60), 8);
        cache.insert("c1", 1, "old").await;

        assert_eq!(cache.get("c1", 1).await, Some("old"));
        assert_eq!(cache.get("c1", 2).await, None);

        cache.insert("c1", 2, "new").await;
        assert_eq!(cache.get("c1", 2).await, Some("new"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = ClientCache::new(Duration::from_secs(60), 8);
        cache.insert("c1", 7, 1u32).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("c1", 7).await, Some(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("c1", 7).await, None);

        cache.insert("c2", 7, 2u32).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicts_oldest_when_full() {
        let cache = ClientCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 0, 'a').await;
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("b", 0, 'b').await;
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert("c", 0, 'c').await;

        assert_eq!(cache.get("a", 0).await, None);
        assert_eq!(cache.get("b", 0).await, Some('b'));
        assert_eq!(cache.get("c", 0).await, Some('c'));
    }

    #[tokio::test]
    async fn test_invalidate_and_disabled_config() {
        let cache = ClientCache::new(Duration::from_secs(60), 2);
        cache.insert("a", 0, ()).await;
        assert!(cache.invalidate("a").await);
        assert!(!cache.invalidate("a").await);
        assert!(cache.is_empty().await);

        let disabled = ClientCacheConfig {
            enabled: false,
            ..ClientCacheConfig::default()
        };
        assert!(ClientCache::<()>::from_config(&disabled).is_none());
        assert!(ClientCache::<()>::from_config(&ClientCacheConfig::default()).is_some());
    }
}
