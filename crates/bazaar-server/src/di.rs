//! Dependency injection module using Shaku.
//!
//! The cache is built once per process and shared by every consumer as
//! `Arc<dyn CacheService>`.

use bazaar_cache::{CacheService, RedisCacheService};
use bazaar_config::CacheConfig;
use shaku::{module, HasComponent};
use std::sync::Arc;

// Process-wide module holding the remote cache.
module! {
    pub CacheModule {
        components = [
            RedisCacheService,
        ],
        providers = [],
    }
}

/// Builds the cache module from configuration.
///
/// The cache is not connected yet; call
/// [`CacheService::initialize`] on the resolved component.
pub fn build_cache_module(config: &CacheConfig) -> Arc<CacheModule> {
    let module = CacheModule::builder()
        .with_component_parameters::<RedisCacheService>(RedisCacheService::parameters(
            config.clone(),
        ))
        .build();

    Arc::new(module)
}

/// Trait for resolving the cache from a module.
pub trait CacheResolver {
    /// Resolves the cache service.
    fn cache(&self) -> Arc<dyn CacheService>;
}

impl CacheResolver for CacheModule {
    fn cache(&self) -> Arc<dyn CacheService> {
        self.resolve()
    }
}
