//! Common test infrastructure for cache integration tests.

#![allow(dead_code)]

use bazaar_cache::{CacheService, RedisCacheService};
use bazaar_config::CacheConfig;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Test Redis container wrapper.
///
/// Manages a Redis testcontainer lifecycle and hands out connected cache
/// services bound to it.
pub struct TestRedis {
    container: ContainerAsync<Redis>,
    url: String,
}

impl TestRedis {
    /// Starts a fresh Redis container.
    pub async fn new() -> Self {
        let container = Redis::default()
            .start()
            .await
            .expect("Failed to start Redis container");
        Self::from_container(container).await
    }

    /// Starts a Redis container from a specific image tag.
    pub async fn with_tag(tag: &str) -> Self {
        let container = Redis::default()
            .with_tag(tag)
            .start()
            .await
            .expect("Failed to start Redis container");
        Self::from_container(container).await
    }

    async fn from_container(container: ContainerAsync<Redis>) -> Self {
        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");

        Self {
            container,
            url: format!("redis://127.0.0.1:{}/0", port),
        }
    }

    /// Stops the server while keeping the container around.
    pub async fn stop(&self) {
        self.container
            .stop()
            .await
            .expect("Failed to stop Redis container");
    }

    /// Connection string of the container.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cache settings pointing at the container.
    pub fn config(&self, prefix: &str) -> CacheConfig {
        CacheConfig {
            url: Some(self.url.clone()),
            prefix: prefix.to_string(),
            default_ttl_secs: 60,
            pool_size: 16,
            min_idle: 2,
            min_retry_backoff_ms: 100,
            max_retry_backoff_ms: 500,
            ..Default::default()
        }
    }

    /// Connected cache service using `prefix`.
    pub async fn cache(&self, prefix: &str) -> Arc<RedisCacheService> {
        self.cache_with(self.config(prefix)).await
    }

    /// Connected cache service built from custom settings.
    pub async fn cache_with(&self, config: CacheConfig) -> Arc<RedisCacheService> {
        let cache = RedisCacheService::new(config);
        cache
            .initialize()
            .await
            .expect("Failed to initialize cache");
        Arc::new(cache)
    }
}
