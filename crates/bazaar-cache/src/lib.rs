//! # Bazaar Cache
//!
//! Resilient Redis access layer for the Bazaar marketplace backend.
//!
//! - Pooled connections with a probed, retried startup
//! - Degrades to a not-connected layer on managed hosting
//! - JSON values for scalars, hashes and lists
//! - Deployment-scoped key namespace
//! - Statistics and health reports parsed from `INFO`
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_cache::{keys, CacheExt, CacheService, RedisCacheService};
//! use std::time::Duration;
//!
//! let cache = RedisCacheService::new(config.cache.clone());
//! cache.initialize().await?;
//!
//! cache.set_as(&keys::session("abc"), &session, Some(Duration::from_secs(30))).await?;
//! let session: Option<Session> = cache.get_as(&keys::session("abc")).await?;
//! ```

pub mod codec;
pub mod connection;
pub mod error;
pub mod interface;
pub mod keys;
pub mod metrics;
pub mod namespace;
pub mod redis_cache;
pub mod stats;

pub use connection::{ConnectionManager, RedisEndpoint};
pub use error::{CacheError, CacheErrorKind, CacheResult};
pub use interface::{CacheExt, CacheService, KeyTtl};
pub use metrics::{register_metrics, CacheMetrics};
pub use namespace::KeyNamespace;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL};
pub use stats::{parse_info, CacheStats, CacheStatus, HealthState, HealthStatus, InfoSnapshot};
