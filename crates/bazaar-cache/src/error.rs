//! Cache error types.

use bazaar_core::BazaarError;
use bazaar_resilience::TimeoutElapsed;
use redis::ErrorKind;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Broad classification of a [`CacheError`].
///
/// Callers branch on this rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheErrorKind {
    /// The settings cannot describe a reachable server.
    Configuration,
    /// The server could not be reached or the round trip did not complete.
    Connectivity,
    /// The server answered but rejected the command or returned an
    /// unexpected reply type, e.g. `WRONGTYPE` or a non-integer `INCRBY`.
    Command,
    /// A stored payload or a caller value could not be converted.
    Serialization,
}

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Malformed connection string or unusable pool settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The cache was never connected, failed to connect, or was closed.
    #[error("Cache is not connected")]
    NotConnected,

    /// Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Redis pool error.
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    /// A round trip exceeded its deadline.
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> CacheErrorKind {
        match self {
            Self::Configuration(_) => CacheErrorKind::Configuration,
            Self::Redis(err) if is_command_rejection(err) => CacheErrorKind::Command,
            Self::NotConnected | Self::Redis(_) | Self::Pool(_) | Self::Timeout(_) => {
                CacheErrorKind::Connectivity
            }
            Self::Serialization(_) => CacheErrorKind::Serialization,
        }
    }

    /// Returns true if the cache could not be reached.
    ///
    /// Callers usually treat these as a miss and fall through to the
    /// system of record.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self.kind(), CacheErrorKind::Connectivity)
    }

    /// Returns true if a value could not be encoded or decoded.
    #[must_use]
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind(), CacheErrorKind::Serialization)
    }

    /// Returns true if the server refused the command.
    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(self.kind(), CacheErrorKind::Command)
    }
}

/// A reply from a reachable server that refused the request. I/O, protocol,
/// cluster and server-availability failures are not rejections.
fn is_command_rejection(err: &redis::RedisError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ResponseError
            | ErrorKind::ExtensionError
            | ErrorKind::TypeError
            | ErrorKind::ExecAbortError
            | ErrorKind::NoScriptError
    )
}

impl From<TimeoutElapsed> for CacheError {
    fn from(err: TimeoutElapsed) -> Self {
        Self::Timeout(err.0)
    }
}

impl From<CacheError> for BazaarError {
    fn from(err: CacheError) -> Self {
        match err.kind() {
            CacheErrorKind::Configuration => Self::Configuration(err.to_string()),
            CacheErrorKind::Serialization => Self::Serialization(err.to_string()),
            CacheErrorKind::Command => Self::Internal(err.to_string()),
            CacheErrorKind::Connectivity => match err {
                CacheError::Timeout(_) => Self::Timeout(err.to_string()),
                other => Self::Cache(other.to_string()),
            },
        }
    }
}
