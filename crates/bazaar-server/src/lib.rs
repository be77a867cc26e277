//! # Bazaar Server Library
//!
//! Dependency injection wiring and startup helpers for the Bazaar server.

pub mod di;
pub mod startup;
