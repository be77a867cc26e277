//! Metrics for cache monitoring.
//!
//! Emitted through the `metrics` facade; nothing is recorded until the
//! host process installs a recorder.

use crate::error::{CacheError, CacheErrorKind};
use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the cache layer.
pub mod names {
    /// Lookups that found a value.
    pub const CACHE_HITS_TOTAL: &str = "bazaar_cache_hits_total";
    /// Lookups that found nothing.
    pub const CACHE_MISSES_TOTAL: &str = "bazaar_cache_misses_total";
    /// Failed operations.
    pub const CACHE_ERRORS_TOTAL: &str = "bazaar_cache_errors_total";
    /// 1 while connected, 0 otherwise.
    pub const CACHE_CONNECTED: &str = "bazaar_cache_connected";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Cache lookups that found a value");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Cache lookups that found nothing");
    describe_counter!(names::CACHE_ERRORS_TOTAL, "Cache operations that failed");
    describe_gauge!(names::CACHE_CONNECTED, "Whether the cache is connected");
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a lookup that found a value.
    pub fn hit(operation: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "operation" => operation).increment(1);
    }

    /// Record a lookup that found nothing.
    pub fn miss(operation: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "operation" => operation).increment(1);
    }

    /// Record a failed operation.
    pub fn error(operation: &'static str, error: &CacheError) {
        let kind = match error.kind() {
            CacheErrorKind::Configuration => "configuration",
            CacheErrorKind::Connectivity => "connectivity",
            CacheErrorKind::Serialization => "serialization",
            CacheErrorKind::Command => "command",
        };
        counter!(
            names::CACHE_ERRORS_TOTAL,
            "operation" => operation,
            "kind" => kind
        )
        .increment(1);
    }

    /// Record the connection state.
    pub fn connected(connected: bool) {
        gauge!(names::CACHE_CONNECTED).set(if connected { 1.0 } else { 0.0 });
    }
}
