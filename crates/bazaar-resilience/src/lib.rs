//! # Bazaar Resilience
//!
//! Resilience patterns for the Bazaar backend.
//! Provides bounded retry with backoff and per-call timeouts.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
