//! In-memory cache implementation - used when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// Process-local cache over a `HashMap` behind an async `RwLock`.
///
/// Entries are lost on restart and are not shared between server processes.
/// Every `set` evicts the entries that have expired so far.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if entry.is_expired() {
            drop(store);
            let mut store = self.store.write().await;
            // Re-check: another writer may have refreshed the entry meanwhile.
            if store.get(key).is_some_and(CacheEntry::is_expired) {
                store.remove(key);
            }
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.retain(|_, entry| !entry.is_expired());
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("index_page:anon:1", "<html>", None).await.unwrap();
        assert_eq!(
            cache.get("index_page:anon:1").await,
            Some("<html>".to_string())
        );
        assert!(cache.exists("index_page:anon:1").await);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("key1", "value1", None).await.unwrap();
        cache.delete("key1").await.unwrap();
        assert_eq!(cache.get("key1").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_gone() {
        let cache = InMemoryCache::new();
        cache
            .set("key1", "value1", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("key1").await, None);
        assert!(!cache.exists("key1").await);
    }

    #[tokio::test]
    async fn test_set_evicts_expired_entries() {
        let cache = InMemoryCache::new();
        for n in 0..1000 {
            cache
                .set(&format!("index_page:anon:{n}"), "<html>", Some(Duration::from_millis(1)))
                .await
                .unwrap();
        }
        cache.set("forever", "1", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.set("fresh", "2", Some(Duration::from_secs(60))).await.unwrap();

        let store = cache.store.read().await;
        assert_eq!(store.len(), 2);
        assert!(store.contains_key("forever"));
        assert!(store.contains_key("fresh"));
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();
        cache.set("a", "1", None).await.unwrap();
        cache.set("b", "2", None).await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.get("b").await, None);
    }
}
