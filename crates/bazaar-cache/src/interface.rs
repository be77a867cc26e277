//! The cache contract consumed by the rest of the backend.

use crate::error::CacheResult;
use crate::stats::{CacheStats, HealthStatus};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shaku::Interface;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key expires after this long.
    Expires(Duration),
    /// The key exists and never expires.
    Persistent,
    /// The key does not exist.
    Missing,
}

impl KeyTtl {
    /// Interpret a `PTTL` reply.
    pub fn from_pttl(millis: i64) -> Self {
        match millis {
            -2 => Self::Missing,
            m if m < 0 => Self::Persistent,
            m => Self::Expires(Duration::from_millis(m.unsigned_abs())),
        }
    }

    /// Remaining lifetime, if the key expires.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Expires(d) => Some(*d),
            Self::Persistent | Self::Missing => None,
        }
    }
}

/// Remote cache operations.
///
/// Keys are logical keys: the implementation adds and strips its own
/// namespace. A missing key or field is `Ok(None)`, never an error.
/// Operations are never retried; a connectivity error means the cache
/// is unavailable, not that the data is absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Interface + Send + Sync {
    /// Open the connection pool and probe the server.
    async fn initialize(&self) -> CacheResult<()>;

    /// Store a value. `None` or a zero TTL uses the configured default.
    async fn set(&self, key: &str, value: &Value, ttl: Option<Duration>) -> CacheResult<()>;

    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Remove a key. Succeeds whether or not it existed.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Reset the remaining lifetime. A zero TTL expires the key immediately.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()>;

    async fn ttl(&self, key: &str) -> CacheResult<KeyTtl>;

    /// Atomically add `by` and return the new value.
    async fn increment(&self, key: &str, by: i64) -> CacheResult<i64>;

    /// Prepend values so that they read back in argument order.
    async fn lpush(&self, key: &str, values: &[Value]) -> CacheResult<()>;

    /// Inclusive range; negative indices count from the end.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> CacheResult<Vec<Value>>;

    async fn hset(&self, key: &str, field: &str, value: &Value) -> CacheResult<()>;

    async fn hget(&self, key: &str, field: &str) -> CacheResult<Option<Value>>;

    /// All fields of a hash. Fails if any field cannot be decoded.
    async fn hget_all(&self, key: &str) -> CacheResult<HashMap<String, Value>>;

    async fn hdel(&self, key: &str, fields: &[String]) -> CacheResult<()>;

    /// Logical keys matching a glob pattern.
    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// Remove every key of this deployment.
    async fn flush(&self) -> CacheResult<()>;

    /// Remove keys matching a pattern and return how many were deleted.
    ///
    /// Enumeration and deletion are separate round trips, so keys written
    /// in between are not removed.
    async fn flush_pattern(&self, pattern: &str) -> CacheResult<u64>;

    async fn get_stats(&self) -> CacheResult<CacheStats>;

    async fn health_check(&self) -> CacheResult<HealthStatus>;

    /// Release the pool. Idempotent.
    async fn close(&self) -> CacheResult<()>;

    fn is_connected(&self) -> bool;
}

/// Typed helpers over [`CacheService`].
#[async_trait]
pub trait CacheExt: CacheService {
    /// Get a typed value from the cache.
    async fn get_as<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set_as<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, &value, ttl).await
    }

    /// Get a value or compute and cache it.
    ///
    /// Any cache failure falls through to `factory`; only its error is returned.
    async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        factory: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        match self.get_as::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "Cache read failed, computing value"),
        }

        let value = factory().await?;

        if let Err(e) = self.set_as(key, &value, ttl).await {
            debug!(key = %key, error = %e, "Failed to cache computed value");
        }

        Ok(value)
    }
}

impl<T: CacheService + ?Sized> CacheExt for T {}
