//! System probe port
//!
//! Reads host memory, CPU and GPU information.

use async_trait::async_trait;
use palaver_domain::SystemProfile;

/// Source of [`SystemProfile`] snapshots.
///
/// Probing is advisory: implementations swallow OS and tool failures and
/// leave the affected fields zeroed or empty instead of returning an error.
#[async_trait]
pub trait SystemProbe: Send + Sync {
    async fn detect(&self) -> SystemProfile;
}

/// Probe that always returns the same profile. Useful for tests and for
/// pinning resource decisions from configuration.
pub struct FixedProbe(pub SystemProfile);

#[async_trait]
impl SystemProbe for FixedProbe {
    async fn detect(&self) -> SystemProfile {
        self.0.clone()
    }
}
