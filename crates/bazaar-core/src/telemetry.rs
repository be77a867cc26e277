//! Logging setup built on `tracing-subscriber`.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::BazaarResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Builds the default filter directive for a base level.
///
/// Bazaar crates log at `debug` whatever the base level is.
#[must_use]
pub fn default_filter_directive(level: &str) -> String {
    format!("{},bazaar=debug", level)
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
#[cfg(feature = "telemetry")]
pub fn init_logging(level: &str, format: LogFormat) -> BazaarResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| {
        crate::BazaarError::Internal(format!("Failed to initialize logging: {}", e))
    })?;

    tracing::debug!(level = %level, format = %format, "Logging initialized");
    Ok(())
}

/// Placeholder for when telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_level: &str, _format: LogFormat) -> BazaarResult<()> {
    Ok(())
}
