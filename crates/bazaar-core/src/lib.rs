//! # Bazaar Core
//!
//! Core types, error definitions and logging setup shared by every
//! crate of the Bazaar marketplace backend.

pub mod error;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use telemetry::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
