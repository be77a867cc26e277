//! Server startup utilities.

use bazaar_cache::{keys, CacheService, HealthState};
use bazaar_config::AppConfig;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// TTL of the startup self-test entry.
const SELF_TEST_TTL: Duration = Duration::from_secs(60);

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____
   / __ )____ _____  ____ _____ ______
  / __  / __ `/_  / / __ `/ __ `/ ___/
 / /_/ / /_/ / / /_/ /_/ / /_/ / /
/_____/\__,_/ /___/\__,_/\__,_/_/
    "#);
}

/// Prints the resolved startup configuration.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Application: {} v{}", config.app.name, config.app.version);
    info!("Environment: {}", config.app.environment);
    info!("Hosting:     {}", config.cache.hosting);
    info!("Key prefix:  {}", config.cache.prefix);
    info!("Default TTL: {}s", config.cache.default_ttl_secs);
    info!("{}", separator);
}

/// Writes a short-lived entry to check the cache accepts writes.
///
/// Returns true if the write succeeded. A failure is only logged.
pub async fn run_self_test(cache: &dyn CacheService) -> bool {
    let value = json!(format!("bazaar_{}", env!("CARGO_PKG_VERSION")));

    match cache
        .set(keys::startup_check(), &value, Some(SELF_TEST_TTL))
        .await
    {
        Ok(()) => {
            info!("Cache self-test passed");
            true
        }
        Err(e) => {
            warn!(error = %e, "Cache self-test failed");
            false
        }
    }
}

/// Logs the current cache health and returns its state.
pub async fn report_health(cache: &dyn CacheService) -> Option<HealthState> {
    match cache.health_check().await {
        Ok(health) => {
            info!(
                status = ?health.status,
                environment = %health.environment,
                retry_count = health.retry_count,
                keys = health.stats.as_ref().map(|s| s.keys_count),
                "{}",
                health.message
            );
            Some(health.status)
        }
        Err(e) => {
            warn!(error = %e, "Cache health check failed");
            None
        }
    }
}
