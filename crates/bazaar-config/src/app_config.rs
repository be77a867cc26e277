//! Application configuration structures.

use crate::HostingMode;
use bazaar_core::LogFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Remote cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "bazaar".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Remote cache (Redis) configuration.
///
/// Either `url` is set, in which case it wins over the discrete
/// `host`/`port`/`password`/`db` fields, or the discrete fields are used.
/// The tuning fields apply to both forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Connection string (`redis://` or `rediss://`).
    pub url: Option<String>,
    /// Redis host.
    pub host: String,
    /// Redis port.
    pub port: u16,
    /// Redis password.
    pub password: Option<String>,
    /// Database index.
    pub db: i64,
    /// Prefix prepended to every key written by this deployment.
    pub prefix: String,
    /// TTL applied when a caller does not pass one. Zero means no expiry.
    pub default_ttl_secs: u64,
    /// Maximum connection attempts beyond the first.
    pub max_retries: u32,
    /// Smallest delay between connection attempts.
    pub min_retry_backoff_ms: u64,
    /// Largest delay between connection attempts.
    pub max_retry_backoff_ms: u64,
    /// Timeout for opening a connection.
    pub dial_timeout_secs: u64,
    /// Per round-trip timeout for reads.
    pub read_timeout_secs: u64,
    /// Per round-trip timeout for writes.
    pub write_timeout_secs: u64,
    /// Maximum number of pooled connections.
    pub pool_size: usize,
    /// Connections opened eagerly once the liveness probe succeeds.
    pub min_idle: usize,
    /// Hosting mode.
    pub hosting: HostingMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
            prefix: "bazaar:".to_string(),
            default_ttl_secs: 3600,
            max_retries: 3,
            min_retry_backoff_ms: 1000,
            max_retry_backoff_ms: 5000,
            dial_timeout_secs: 10,
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            pool_size: 100,
            min_idle: 10,
            hosting: HostingMode::Local,
        }
    }
}

impl CacheConfig {
    /// Returns the default TTL as a Duration.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Returns the minimum retry backoff as a Duration.
    #[must_use]
    pub const fn min_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.min_retry_backoff_ms)
    }

    /// Returns the maximum retry backoff as a Duration.
    #[must_use]
    pub const fn max_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.max_retry_backoff_ms)
    }

    /// Returns the dial timeout as a Duration.
    #[must_use]
    pub const fn dial_timeout(&self) -> Duration {
        Duration::from_secs(self.dial_timeout_secs)
    }

    /// Returns the read timeout as a Duration.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Returns the write timeout as a Duration.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Returns true if a connection string was supplied.
    #[must_use]
    pub fn uses_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.port, 6379);
        assert_eq!(config.prefix, "bazaar:");
        assert_eq!(config.default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.min_retry_backoff(), Duration::from_secs(1));
        assert_eq!(config.max_retry_backoff(), Duration::from_secs(5));
        assert_eq!(config.dial_timeout(), Duration::from_secs(10));
        assert_eq!(config.read_timeout(), Duration::from_secs(30));
        assert_eq!(config.write_timeout(), Duration::from_secs(30));
        assert_eq!(config.pool_size, 100);
        assert_eq!(config.min_idle, 10);
        assert!(!config.uses_url());
    }

    #[test]
    fn test_uses_url_ignores_blank() {
        let mut config = CacheConfig {
            url: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.uses_url());

        config.url = Some("redis://cache:6379/0".to_string());
        assert!(config.uses_url());
    }

    #[test]
    fn test_partial_cache_section_keeps_defaults() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"prefix": "staging:", "port": 6380}"#).unwrap();
        assert_eq!(config.prefix, "staging:");
        assert_eq!(config.port, 6380);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.max_retries, 3);
    }
}
