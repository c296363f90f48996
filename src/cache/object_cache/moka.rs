use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Self::with_settings(config.cache.memory.max_capacity, config.cache.default_ttl)
    }

    /// Build a cache with explicit capacity and TTL, bypassing the global
    /// configuration. Used directly by tests.
    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Result<Self, String> {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl_secs))
            .build();

        debug!("MokaCacheWrapper initialized with max capacity: {max_capacity}");
        Ok(Self { inner })
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
        // The Moka cache is built with a fixed time-to-live; the per-entry
        // ttl argument is ignored here.
        self.inner.insert(key, value).await;
    }

    async fn remove_raw(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn clear(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove_roundtrip() {
        let cache = MokaCacheWrapper::with_settings(64, 300).unwrap();
        cache
            .insert_raw("student-grades:s1:t1".into(), "{}".into(), 300)
            .await;

        assert_eq!(
            cache.get_raw("student-grades:s1:t1").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove_raw("student-grades:s1:t1").await;
        assert_eq!(
            cache.get_raw("student-grades:s1:t1").await,
            CacheResult::NotFound
        );
    }
}
