//! Result type aliases for Bazaar.

use crate::BazaarError;

/// A specialized `Result` type for application-level operations.
pub type BazaarResult<T> = Result<T, BazaarError>;
