//! Timeout wrapper for async operations.

use bazaar_core::BazaarError;
use std::time::Duration;
use thiserror::Error;

/// Raised when an operation does not complete within its deadline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Operation timed out after {0:?}")]
pub struct TimeoutElapsed(pub Duration);

impl From<TimeoutElapsed> for BazaarError {
    fn from(err: TimeoutElapsed) -> Self {
        Self::Timeout(err.to_string())
    }
}

/// Wraps an async operation with a timeout.
///
/// The caller's error type only needs to absorb [`TimeoutElapsed`].
pub async fn with_timeout<F, Fut, T, E>(duration: Duration, f: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: From<TimeoutElapsed>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| E::from(TimeoutElapsed(duration)))?
}
