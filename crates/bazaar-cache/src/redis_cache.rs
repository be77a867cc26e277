//! Redis-based cache implementation.

use crate::codec;
use crate::connection::ConnectionManager;
use crate::error::{CacheError, CacheResult};
use crate::interface::{CacheService, KeyTtl};
use crate::metrics::CacheMetrics;
use crate::namespace::KeyNamespace;
use crate::stats::{parse_info, CacheStats, HealthState, HealthStatus};
use async_trait::async_trait;
use bazaar_config::CacheConfig;
use deadpool_redis::{redis::AsyncCommands, Connection};
use serde_json::Value;
use shaku::Component;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default TTL used when the service is built without configuration (1 hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Keys deleted per `DEL` command during pattern deletes.
const DELETE_BATCH: usize = 1000;

/// Redis-based cache service.
#[derive(Component)]
#[shaku(interface = CacheService)]
pub struct RedisCacheService {
    /// Pool and connection state.
    connection: ConnectionManager,
    /// Deployment key namespace.
    keys: KeyNamespace,
    /// TTL applied when callers pass none. Zero means no expiry.
    #[shaku(default = DEFAULT_TTL)]
    default_ttl: Duration,
}

impl RedisCacheService {
    /// Create a cache service from configuration. Call
    /// [`initialize`](CacheService::initialize) before use.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let RedisCacheServiceParameters {
            connection,
            keys,
            default_ttl,
        } = Self::parameters(config);
        Self {
            connection,
            keys,
            default_ttl,
        }
    }

    /// Component parameters for the DI module.
    #[must_use]
    pub fn parameters(config: CacheConfig) -> RedisCacheServiceParameters {
        RedisCacheServiceParameters {
            keys: KeyNamespace::new(config.prefix.clone()),
            default_ttl: config.default_ttl(),
            connection: ConnectionManager::new(config),
        }
    }

    /// Connection manager backing this service.
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Key namespace of this deployment.
    pub fn namespace(&self) -> &KeyNamespace {
        &self.keys
    }

    fn environment(&self) -> &'static str {
        self.connection.environment()
    }

    /// TTL to apply on write, or `None` for no expiry.
    fn effective_ttl(&self, ttl: Option<Duration>) -> Option<Duration> {
        ttl.filter(|t| !t.is_zero())
            .or(Some(self.default_ttl))
            .filter(|t| !t.is_zero())
    }

    /// Log and count a failed operation, then hand the error back.
    fn failed(&self, operation: &'static str, key: &str, err: CacheError) -> CacheError {
        error!(
            operation,
            key = %key,
            environment = self.environment(),
            error = %err,
            "Cache operation failed"
        );
        CacheMetrics::error(operation, &err);
        err
    }

    /// Pooled connection for `operation`. Pool failures are logged and
    /// counted; the disconnected fast path is not.
    async fn checkout(&self, operation: &'static str, key: &str) -> CacheResult<Connection> {
        match self.connection.acquire().await {
            Err(CacheError::NotConnected) => Err(CacheError::NotConnected),
            other => other.map_err(|e| self.failed(operation, key, e)),
        }
    }

    /// `KEYS` followed by batched `DEL`. Returns the number of keys removed.
    async fn delete_matching(
        &self,
        conn: &mut Connection,
        operation: &'static str,
        pattern: &str,
    ) -> CacheResult<u64> {
        let stored: Vec<String> = self
            .connection
            .read(redis::cmd("KEYS").arg(pattern).query_async(&mut *conn))
            .await
            .map_err(|e| self.failed(operation, pattern, e))?;

        let mut deleted = 0u64;
        for batch in stored.chunks(DELETE_BATCH) {
            let removed: u64 = self
                .connection
                .write(conn.del(batch))
                .await
                .map_err(|e| self.failed(operation, pattern, e))?;
            deleted += removed;
        }
        Ok(deleted)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn list_index(index: i64) -> isize {
    isize::try_from(index).unwrap_or(if index < 0 { isize::MIN } else { isize::MAX })
}

#[async_trait]
impl CacheService for RedisCacheService {
    async fn initialize(&self) -> CacheResult<()> {
        self.connection.initialize().await
    }

    async fn set(&self, key: &str, value: &Value, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.checkout("set", key).await?;
        let stored = self.keys.key(key);
        let payload = codec::encode(value).map_err(|e| self.failed("set", &stored, e))?;

        let ttl = self.effective_ttl(ttl);
        let written = match ttl {
            Some(ttl) => {
                self.connection
                    .write(conn.pset_ex::<_, _, ()>(&stored, payload, millis(ttl)))
                    .await
            }
            None => self.connection.write(conn.set::<_, _, ()>(&stored, payload)).await,
        };
        written.map_err(|e| self.failed("set", &stored, e))?;

        debug!(key = %stored, ttl = ?ttl, "Cached key");
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let mut conn = self.checkout("get", key).await?;
        let stored = self.keys.key(key);

        let raw: Option<String> = self
            .connection
            .read(conn.get(&stored))
            .await
            .map_err(|e| self.failed("get", &stored, e))?;

        match raw {
            Some(raw) => {
                CacheMetrics::hit("get");
                debug!(key = %stored, "Cache hit");
                codec::decode(&raw)
                    .map(Some)
                    .map_err(|e| self.failed("get", &stored, e))
            }
            None => {
                CacheMetrics::miss("get");
                debug!(key = %stored, "Cache miss");
                Ok(None)
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.checkout("delete", key).await?;
        let stored = self.keys.key(key);

        let deleted: i64 = self
            .connection
            .write(conn.del(&stored))
            .await
            .map_err(|e| self.failed("delete", &stored, e))?;

        debug!(key = %stored, existed = deleted > 0, "Deleted key");
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.checkout("exists", key).await?;
        let stored = self.keys.key(key);

        self.connection
            .read(conn.exists(&stored))
            .await
            .map_err(|e| self.failed("exists", &stored, e))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.checkout("expire", key).await?;
        let stored = self.keys.key(key);
        let ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        let applied: bool = self
            .connection
            .write(conn.pexpire(&stored, ms))
            .await
            .map_err(|e| self.failed("expire", &stored, e))?;

        debug!(key = %stored, ttl = ?ttl, applied, "Updated key expiry");
        Ok(())
    }

    async fn ttl(&self, key: &str) -> CacheResult<KeyTtl> {
        let mut conn = self.checkout("ttl", key).await?;
        let stored = self.keys.key(key);

        let pttl: i64 = self
            .connection
            .read(conn.pttl(&stored))
            .await
            .map_err(|e| self.failed("ttl", &stored, e))?;

        Ok(KeyTtl::from_pttl(pttl))
    }

    async fn increment(&self, key: &str, by: i64) -> CacheResult<i64> {
        let mut conn = self.checkout("increment", key).await?;
        let stored = self.keys.key(key);

        self.connection
            .write(conn.incr(&stored, by))
            .await
            .map_err(|e| self.failed("increment", &stored, e))
    }

    async fn lpush(&self, key: &str, values: &[Value]) -> CacheResult<()> {
        let mut conn = self.checkout("lpush", key).await?;
        let stored = self.keys.key(key);
        if values.is_empty() {
            return Ok(());
        }

        // LPUSH prepends one at a time, so push in reverse to keep argument order.
        let payloads = values
            .iter()
            .rev()
            .map(|v| codec::encode(v))
            .collect::<CacheResult<Vec<_>>>()
            .map_err(|e| self.failed("lpush", &stored, e))?;

        let length: i64 = self
            .connection
            .write(conn.lpush(&stored, &payloads))
            .await
            .map_err(|e| self.failed("lpush", &stored, e))?;

        debug!(key = %stored, pushed = payloads.len(), length, "Pushed list values");
        Ok(())
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> CacheResult<Vec<Value>> {
        let mut conn = self.checkout("lrange", key).await?;
        let stored = self.keys.key(key);

        let raw: Vec<String> = self
            .connection
            .read(conn.lrange(&stored, list_index(start), list_index(stop)))
            .await
            .map_err(|e| self.failed("lrange", &stored, e))?;

        raw.iter()
            .map(|item| codec::decode(item))
            .collect::<CacheResult<Vec<_>>>()
            .map_err(|e| self.failed("lrange", &stored, e))
    }

    async fn hset(&self, key: &str, field: &str, value: &Value) -> CacheResult<()> {
        let mut conn = self.checkout("hset", key).await?;
        let stored = self.keys.key(key);
        let payload = codec::encode(value).map_err(|e| self.failed("hset", &stored, e))?;

        let _: i64 = self
            .connection
            .write(conn.hset(&stored, field, payload))
            .await
            .map_err(|e| self.failed("hset", &stored, e))?;

        debug!(key = %stored, field = %field, "Set hash field");
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> CacheResult<Option<Value>> {
        let mut conn = self.checkout("hget", key).await?;
        let stored = self.keys.key(key);

        let raw: Option<String> = self
            .connection
            .read(conn.hget(&stored, field))
            .await
            .map_err(|e| self.failed("hget", &stored, e))?;

        match raw {
            Some(raw) => {
                CacheMetrics::hit("hget");
                codec::decode(&raw)
                    .map(Some)
                    .map_err(|e| self.failed("hget", &stored, e))
            }
            None => {
                CacheMetrics::miss("hget");
                debug!(key = %stored, field = %field, "Hash field miss");
                Ok(None)
            }
        }
    }

    async fn hget_all(&self, key: &str) -> CacheResult<HashMap<String, Value>> {
        let mut conn = self.checkout("hget_all", key).await?;
        let stored = self.keys.key(key);

        let raw: HashMap<String, String> = self
            .connection
            .read(conn.hgetall(&stored))
            .await
            .map_err(|e| self.failed("hget_all", &stored, e))?;

        let mut decoded = HashMap::with_capacity(raw.len());
        for (field, payload) in raw {
            match codec::decode(&payload) {
                Ok(value) => {
                    decoded.insert(field, value);
                }
                Err(e) => {
                    debug!(key = %stored, field = %field, "Hash field is not valid JSON");
                    return Err(self.failed("hget_all", &stored, e));
                }
            }
        }
        Ok(decoded)
    }

    async fn hdel(&self, key: &str, fields: &[String]) -> CacheResult<()> {
        let mut conn = self.checkout("hdel", key).await?;
        let stored = self.keys.key(key);
        if fields.is_empty() {
            return Ok(());
        }

        let removed: i64 = self
            .connection
            .write(conn.hdel(&stored, fields))
            .await
            .map_err(|e| self.failed("hdel", &stored, e))?;

        debug!(key = %stored, removed, "Deleted hash fields");
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.checkout("keys", pattern).await?;
        let namespaced = self.keys.pattern(pattern);

        let stored: Vec<String> = self
            .connection
            .read(conn.keys(&namespaced))
            .await
            .map_err(|e| self.failed("keys", &namespaced, e))?;

        Ok(stored
            .iter()
            .map(|k| self.keys.strip(k).to_string())
            .collect())
    }

    async fn flush(&self) -> CacheResult<()> {
        let mut conn = self.checkout("flush", "*").await?;

        if self.keys.is_empty() {
            let _: () = self
                .connection
                .write(redis::cmd("FLUSHDB").query_async(&mut conn))
                .await
                .map_err(|e| self.failed("flush", "*", e))?;
            info!(environment = self.environment(), "Flushed cache database");
            return Ok(());
        }

        let namespaced = self.keys.everything();
        let deleted = self.delete_matching(&mut conn, "flush", &namespaced).await?;
        info!(
            prefix = %self.keys.prefix(),
            deleted,
            environment = self.environment(),
            "Flushed cache namespace"
        );
        Ok(())
    }

    async fn flush_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.checkout("flush_pattern", pattern).await?;
        let namespaced = self.keys.pattern(pattern);

        let deleted = self
            .delete_matching(&mut conn, "flush_pattern", &namespaced)
            .await?;

        debug!(pattern = %namespaced, deleted, "Deleted keys matching pattern");
        Ok(deleted)
    }

    async fn get_stats(&self) -> CacheResult<CacheStats> {
        let environment = self.environment();
        if !self.connection.is_connected() {
            return Ok(CacheStats::disconnected(environment, self.connection.retry_count()));
        }

        let mut conn = self.checkout("get_stats", "INFO").await?;

        let info: String = self
            .connection
            .read(redis::cmd("INFO").query_async(&mut conn))
            .await
            .map_err(|e| self.failed("get_stats", "INFO", e))?;
        let keys_count: i64 = self
            .connection
            .read(redis::cmd("DBSIZE").query_async(&mut conn))
            .await
            .map_err(|e| self.failed("get_stats", "DBSIZE", e))?;

        Ok(CacheStats::connected(
            &parse_info(&info),
            keys_count,
            environment,
            self.connection.retry_count(),
        ))
    }

    async fn health_check(&self) -> CacheResult<HealthStatus> {
        let environment = self.environment();
        let retry_count = self.connection.retry_count();

        if !self.connection.is_connected() {
            return Ok(HealthStatus::new(
                HealthState::Disconnected,
                "Cache is not connected",
                environment,
                retry_count,
            ));
        }

        if let Err(e) = self.connection.ping().await {
            return Ok(HealthStatus::new(
                HealthState::Unhealthy,
                "Cache did not answer the liveness probe",
                environment,
                retry_count,
            )
            .with_error(e));
        }

        let status = match self.get_stats().await {
            Ok(stats) => HealthStatus::new(
                HealthState::Healthy,
                "Cache is operating normally",
                environment,
                retry_count,
            )
            .with_stats(stats),
            Err(e) => HealthStatus::new(
                HealthState::Degraded,
                "Cache answers but statistics are unavailable",
                environment,
                retry_count,
            )
            .with_error(e),
        };
        Ok(status)
    }

    async fn close(&self) -> CacheResult<()> {
        self.connection.close().await
    }

    fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}
