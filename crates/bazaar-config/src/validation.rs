//! Configuration validation module.
//!
//! Validates every configuration value up front and reports all problems
//! at once, so a misconfigured deployment fails at startup instead of on
//! the first cache call.

use crate::{AppConfig, CacheConfig, ObservabilityConfig};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Neither a connection string nor a host was supplied.
    MissingHost,
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Database index is negative.
    InvalidDatabaseIndex { value: i64 },
    /// Pool size configuration is invalid (min idle must be <= max).
    InvalidPoolSize { min: usize, max: usize },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: usize, maximum: usize },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Retry backoff bounds are inverted.
    InvalidBackoff { min_ms: u64, max_ms: u64 },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHost => {
                write!(f, "Cache host is required when no connection URL is configured")
            }
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidDatabaseIndex { value } => {
                write!(f, "Invalid database index: {} (must not be negative)", value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min idle ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidBackoff { min_ms, max_ms } => {
                write!(
                    f,
                    "Invalid retry backoff: min ({}ms) cannot be greater than max ({}ms)",
                    min_ms, max_ms
                )
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug)]
pub struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the validation errors.
    pub fn errors(&self) -> &[ConfigValidationError] {
        &self.errors
    }

    /// Converts to Result, returning Err with all errors if any exist.
    pub fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: usize = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::new();

        Self::validate_cache(&config.cache, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        result.into_result()
    }

    /// Validates cache configuration.
    fn validate_cache(config: &CacheConfig, result: &mut ValidationResult) {
        if config.uses_url() {
            let raw = config.url.as_deref().unwrap_or_default();
            match Url::parse(raw) {
                Ok(url) if url.scheme() != "redis" && url.scheme() != "rediss" => {
                    result.add_error(ConfigValidationError::InvalidUrl {
                        url_type: "cache".to_string(),
                        message: "URL must start with redis:// or rediss://".to_string(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    result.add_error(ConfigValidationError::InvalidUrl {
                        url_type: "cache".to_string(),
                        message: e.to_string(),
                    });
                }
            }
        } else {
            if config.host.trim().is_empty() {
                result.add_error(ConfigValidationError::MissingHost);
            }
            if config.port == 0 {
                result.add_error(ConfigValidationError::InvalidPort {
                    name: "cache.port".to_string(),
                    value: config.port,
                });
            }
            if config.db < 0 {
                result.add_error(ConfigValidationError::InvalidDatabaseIndex { value: config.db });
            }
        }

        if config.pool_size == 0 || config.min_idle > config.pool_size {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_idle,
                max: config.pool_size,
            });
        }
        if config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.min_retry_backoff_ms > config.max_retry_backoff_ms {
            result.add_error(ConfigValidationError::InvalidBackoff {
                min_ms: config.min_retry_backoff_ms,
                max_ms: config.max_retry_backoff_ms,
            });
        }

        for (name, value) in [
            ("cache.dial_timeout_secs", config.dial_timeout_secs),
            ("cache.read_timeout_secs", config.read_timeout_secs),
            ("cache.write_timeout_secs", config.write_timeout_secs),
        ] {
            if value == 0 {
                result.add_error(ConfigValidationError::NonPositiveTimeout {
                    name: name.to_string(),
                    value,
                });
            }
        }
    }

    /// Validates observability configuration.
    fn validate_observability(config: &ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}
