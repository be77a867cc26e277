//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator, HostingMode};
use bazaar_core::BazaarError;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Platform variables mapped onto `cache.*` keys.
const PLATFORM_VARIABLES: &[(&str, &str)] = &[
    ("REDIS_URL", "cache.url"),
    ("REDIS_HOST", "cache.host"),
    ("REDIS_PORT", "cache.port"),
    ("REDIS_PASSWORD", "cache.password"),
    ("REDIS_DB", "cache.db"),
];

/// Variable set to `true` by the managed hosting platform.
const MANAGED_HOSTING_VARIABLE: &str = "RAILWAY_ENVIRONMENT";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `BAZAAR__` prefix
    /// 5. Platform variables (`REDIS_URL`, `REDIS_HOST`, ... and `RAILWAY_ENVIRONMENT`)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, BazaarError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, BazaarError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), BazaarError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, BazaarError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("BAZAAR_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        info!(environment = %environment, "Loading configuration");

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("BAZAAR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder = apply_platform_overrides(builder, |name| std::env::var(name).ok())
            .map_err(config_error_to_bazaar_error)?;

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_bazaar_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            BazaarError::Configuration(messages.join("; "))
        })?;

        Ok(app_config)
    }
}

/// Applies the conventional platform variables on top of every other source.
///
/// Empty values are ignored so that an exported-but-blank `REDIS_URL` does
/// not shadow the discrete host settings.
fn apply_platform_overrides<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (variable, key) in PLATFORM_VARIABLES {
        let value = lookup(variable).filter(|v| !v.trim().is_empty());
        if value.is_some() {
            debug!(variable = %variable, "Applying platform override");
        }
        builder = builder.set_override_option(*key, value)?;
    }

    if lookup(MANAGED_HOSTING_VARIABLE).as_deref() == Some("true") {
        builder = builder.set_override("cache.hosting", HostingMode::Managed.as_str())?;
    }

    Ok(builder)
}

fn config_error_to_bazaar_error(err: ConfigError) -> BazaarError {
    BazaarError::Configuration(err.to_string())
}
