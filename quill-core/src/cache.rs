//! Key/value cache with expiry. The resolver keeps handler bindings here; handlers may use it too.

use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Shared string cache. Implementations must tolerate concurrent readers and writers.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    async fn forget(&self, key: &str) -> Result<(), CacheError>;
}

impl dyn Cache {
    /// Get `key`, or run `compute` and store its value for `ttl`. Errors from `compute` are not cached.
    pub async fn remember<F, Fut, E>(&self, key: &str, ttl: Duration, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String, E>> + Send,
        E: From<CacheError> + Send,
    {
        if let Some(hit) = self.get(key).await? {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }
        tracing::debug!(key, "cache miss");
        let value = compute().await?;
        self.put(key, value.clone(), ttl).await?;
        Ok(value)
    }
}

/// Process-local cache. Expired entries are swept on `put` and on reading an expired key.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entries, for diagnostics and tests.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, (_, expires_at)| *expires_at > now);
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Keys that are never read again would otherwise stay forever.
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_owned(), (value, now + ttl));
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(feature = "redis")]
pub use self::redis_cache::RedisCache;

#[cfg(feature = "redis")]
mod redis_cache {
    use async_trait::async_trait;
    use redis::aio::ConnectionManager;
    use redis::AsyncCommands;
    use std::time::Duration;

    use super::{Cache, CacheError};

    impl From<redis::RedisError> for CacheError {
        fn from(e: redis::RedisError) -> Self {
            CacheError::Backend(e.to_string())
        }
    }

    /// Redis-backed cache shared by every process of a deployment.
    #[derive(Clone)]
    pub struct RedisCache {
        manager: ConnectionManager,
    }

    impl RedisCache {
        pub async fn connect(url: &str) -> Result<Self, CacheError> {
            let client = redis::Client::open(url)?;
            let manager = ConnectionManager::new(client).await?;
            Ok(Self { manager })
        }
    }

    #[async_trait]
    impl Cache for RedisCache {
        async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            let mut con = self.manager.clone();
            let value: Option<String> = con.get(key).await?;
            Ok(value)
        }

        async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
            let mut con = self.manager.clone();
            // SETEX rejects 0.
            let seconds = ttl.as_secs().max(1);
            con.set_ex::<_, _, ()>(key, value, seconds).await?;
            Ok(())
        }

        async fn forget(&self, key: &str) -> Result<(), CacheError> {
            let mut con = self.manager.clone();
            con.del::<_, ()>(key).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(cache: &InMemoryCache) -> usize {
        cache.entries.read().unwrap().len()
    }

    #[tokio::test(start_paused = true)]
    async fn put_sweeps_expired_entries() {
        let cache = InMemoryCache::new();
        cache.put("token:a", "1".into(), Duration::from_secs(10)).await.unwrap();
        cache.put("token:b", "2".into(), Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;

        cache.put("token:c", "3".into(), Duration::from_secs(60)).await.unwrap();
        assert_eq!(stored(&cache), 2);
        assert_eq!(cache.get("token:a").await.unwrap(), None);
        assert_eq!(cache.get("token:b").await.unwrap().as_deref(), Some("2"));
    }
}
