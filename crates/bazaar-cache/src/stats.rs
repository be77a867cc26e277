//! Server statistics and health reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields extracted from the text returned by `INFO`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoSnapshot {
    pub used_memory_human: Option<String>,
    pub connected_clients: Option<i64>,
    pub keyspace_hits: Option<i64>,
    pub keyspace_misses: Option<i64>,
    pub uptime_in_seconds: Option<i64>,
}

impl InfoSnapshot {
    /// Fraction of lookups that hit, or 0 when there were none.
    pub fn hit_rate(&self) -> f64 {
        hit_rate(
            self.keyspace_hits.unwrap_or(0),
            self.keyspace_misses.unwrap_or(0),
        )
    }
}

/// Parse `INFO` output.
///
/// Section headers, blank lines and unknown fields are skipped. Numeric
/// fields that fail to parse are left unset.
pub fn parse_info(text: &str) -> InfoSnapshot {
    let mut snapshot = InfoSnapshot::default();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match name {
            "used_memory_human" => snapshot.used_memory_human = Some(value.to_string()),
            "connected_clients" => snapshot.connected_clients = value.parse().ok(),
            "keyspace_hits" => snapshot.keyspace_hits = value.parse().ok(),
            "keyspace_misses" => snapshot.keyspace_misses = value.parse().ok(),
            "uptime_in_seconds" => snapshot.uptime_in_seconds = value.parse().ok(),
            _ => {}
        }
    }

    snapshot
}

/// `hits / (hits + misses)`, 0 when both are 0.
pub fn hit_rate(hits: i64, misses: i64) -> f64 {
    let total = hits.saturating_add(misses);
    if total <= 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Connection status reported in [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Connected,
    Disconnected,
}

/// Statistics snapshot, recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub status: CacheStatus,
    pub keys_count: i64,
    pub used_memory: String,
    pub connected_clients: i64,
    pub hits: i64,
    pub misses: i64,
    pub hit_rate: f64,
    pub uptime_seconds: i64,
    pub environment: String,
    pub retry_count: u32,
}

impl CacheStats {
    /// Stats for a layer that is not connected.
    pub fn disconnected(environment: &str, retry_count: u32) -> Self {
        Self {
            status: CacheStatus::Disconnected,
            keys_count: 0,
            used_memory: String::new(),
            connected_clients: 0,
            hits: 0,
            misses: 0,
            hit_rate: 0.0,
            uptime_seconds: 0,
            environment: environment.to_string(),
            retry_count,
        }
    }

    /// Stats for a connected layer.
    pub fn connected(
        info: &InfoSnapshot,
        keys_count: i64,
        environment: &str,
        retry_count: u32,
    ) -> Self {
        let hits = info.keyspace_hits.unwrap_or(0);
        let misses = info.keyspace_misses.unwrap_or(0);
        Self {
            status: CacheStatus::Connected,
            keys_count,
            used_memory: info.used_memory_human.clone().unwrap_or_default(),
            connected_clients: info.connected_clients.unwrap_or(0),
            hits,
            misses,
            hit_rate: hit_rate(hits, misses),
            uptime_seconds: info.uptime_in_seconds.unwrap_or(0),
            environment: environment.to_string(),
            retry_count,
        }
    }
}

/// Health verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Probe and stats both succeeded.
    Healthy,
    /// Probe succeeded, stats failed.
    Degraded,
    /// Probe failed.
    Unhealthy,
    /// Never connected, or closed.
    Disconnected,
}

/// Health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub environment: String,
    pub retry_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    pub(crate) fn new(
        status: HealthState,
        message: impl Into<String>,
        environment: &str,
        retry_count: u32,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
            environment: environment.to_string(),
            retry_count,
            stats: None,
            checked_at: Utc::now(),
        }
    }

    pub(crate) fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub(crate) fn with_stats(mut self, stats: CacheStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Returns true only for [`HealthState::Healthy`].
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}
