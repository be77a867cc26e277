//! Hosting mode configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the process is hosted.
///
/// Controls whether an unreachable cache at startup is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostingMode {
    /// Developer machine or self-managed host. Cache failures at startup are fatal.
    #[default]
    Local,
    /// Constrained/managed hosting platform. The cache degrades to a no-op layer.
    Managed,
}

impl HostingMode {
    /// Returns true if this is a managed hosting platform.
    #[must_use]
    pub const fn is_managed(&self) -> bool {
        matches!(self, Self::Managed)
    }

    /// Returns true if a failed liveness probe during initialization must abort startup.
    #[must_use]
    pub const fn probe_failure_is_fatal(&self) -> bool {
        matches!(self, Self::Local)
    }

    /// Label attached to log events, stats and health reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Managed => "managed",
        }
    }
}

impl fmt::Display for HostingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosting_mode_default() {
        let mode = HostingMode::default();
        assert_eq!(mode, HostingMode::Local);
        assert!(!mode.is_managed());
        assert!(mode.probe_failure_is_fatal());
    }

    #[test]
    fn test_managed_mode_is_lenient() {
        assert!(HostingMode::Managed.is_managed());
        assert!(!HostingMode::Managed.probe_failure_is_fatal());
    }

    #[test]
    fn test_hosting_mode_display() {
        assert_eq!(HostingMode::Local.to_string(), "local");
        assert_eq!(HostingMode::Managed.to_string(), "managed");
    }

    #[test]
    fn test_hosting_mode_serde() {
        let mode: HostingMode = serde_json::from_str("\"managed\"").unwrap();
        assert_eq!(mode, HostingMode::Managed);
    }
}
