//! # Bazaar Config
//!
//! Configuration management for the Bazaar backend.
//! Supports layered configuration from files, environment variables,
//! the conventional `REDIS_*` platform variables, and runtime refresh.

mod app_config;
mod deployment;
mod loader;
mod validation;

pub use app_config::*;
pub use deployment::*;
pub use loader::*;
pub use validation::*;
