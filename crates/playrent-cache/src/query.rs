//! In-memory cache of remote query results, invalidated by tag.

use crate::CacheError;
use playrent_commerce::ids::ProductId;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Label attached to cached queries so mutations can drop them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryTag {
    /// Any product listing.
    Products,
    /// A single product.
    Product(ProductId),
    Cart,
    Wishlist,
    Orders,
}

impl std::fmt::Display for QueryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Products => f.write_str("products"),
            Self::Product(id) => write!(f, "product:{id}"),
            Self::Cart => f.write_str("cart"),
            Self::Wishlist => f.write_str("wishlist"),
            Self::Orders => f.write_str("orders"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    tags: Vec<QueryTag>,
    stored_at: Instant,
}

/// Query result cache keyed by string, grouped by [`QueryTag`].
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<String, Entry>>,
    max_age: Option<Duration>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat entries older than `max_age` as missing.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Cached value for `key`, if present and fresh.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        match entries.get(key) {
            Some(entry) if self.is_fresh(entry) => {
                debug!(key, "query cache hit");
                Ok(Some(serde_json::from_value(entry.value.clone())?))
            }
            _ => {
                debug!(key, "query cache miss");
                Ok(None)
            }
        }
    }

    /// Store `value` under `key` with the given tags.
    pub fn insert<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        tags: Vec<QueryTag>,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            value: serde_json::to_value(value)?,
            tags,
            stored_at: Instant::now(),
        };
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        entries.insert(key.into(), entry);
        Ok(())
    }

    /// Read `key` through the cache, calling `fetch` on a miss.
    ///
    /// The lock is not held while `fetch` runs.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        tags: Vec<QueryTag>,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key, &value, tags)?;
        Ok(value)
    }

    /// Drop every entry carrying `tag`. Returns how many were dropped.
    pub fn invalidate(&self, tag: &QueryTag) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.contains(tag));
        let dropped = before - entries.len();
        debug!(%tag, dropped, "invalidated query tag");
        Ok(dropped)
    }

    /// Drop every entry carrying any of `tags`.
    pub fn invalidate_all_of(&self, tags: &[QueryTag]) -> Result<usize, CacheError> {
        let mut dropped = 0;
        for tag in tags {
            dropped += self.invalidate(tag)?;
        }
        Ok(dropped)
    }

    pub fn remove(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(|_| CacheError::Poisoned)?
            .clear();
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.get(key).is_some_and(|e| self.is_fresh(e)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        self.max_age
            .map_or(true, |max| entry.stored_at.elapsed() <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeded() -> QueryCache {
        let cache = QueryCache::new();
        cache
            .insert("products?page=1", &vec!["p1", "p2"], vec![QueryTag::Products])
            .unwrap();
        cache
            .insert(
                "product:p1",
                &"p1",
                vec![QueryTag::Products, QueryTag::Product(ProductId::new("p1"))],
            )
            .unwrap();
        cache
            .insert("product:p2", &"p2", vec![QueryTag::Product(ProductId::new("p2"))])
            .unwrap();
        cache.insert("cart", &0, vec![QueryTag::Cart]).unwrap();
        cache
    }

    #[test]
    fn test_invalidate_drops_only_tagged() {
        let cache = seeded();
        assert_eq!(cache.invalidate(&QueryTag::Products).unwrap(), 2);

        assert!(!cache.contains("products?page=1"));
        assert!(!cache.contains("product:p1"));
        assert!(cache.contains("product:p2"));
        assert!(cache.contains("cart"));
    }

    #[test]
    fn test_invalidate_single_product() {
        let cache = seeded();
        let dropped = cache
            .invalidate(&QueryTag::Product(ProductId::new("p2")))
            .unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_invalidate_unknown_tag() {
        let cache = seeded();
        assert_eq!(cache.invalidate(&QueryTag::Orders).unwrap(), 0);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_get_typed() {
        let cache = seeded();
        let products: Option<Vec<String>> = cache.get("products?page=1").unwrap();
        assert_eq!(products, Some(vec!["p1".to_string(), "p2".to_string()]));
        assert_eq!(cache.get::<i32>("missing").unwrap(), None);
    }

    #[test]
    fn test_expired_entries_miss() {
        let cache = QueryCache::new().with_max_age(Duration::ZERO);
        cache.insert("cart", &1, vec![QueryTag::Cart]).unwrap();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cache.get::<i32>("cart").unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_or_fetch_only_fetches_on_miss() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value: Result<u32, CacheError> = cache
                .get_or_fetch("wishlist", vec![QueryTag::Wishlist], || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(value.unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate(&QueryTag::Wishlist).unwrap();
        let _: Result<u32, CacheError> = cache
            .get_or_fetch("wishlist", vec![QueryTag::Wishlist], || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
