//! Host resource snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Available memory above which large models are considered runnable.
pub const LARGE_MODEL_MEMORY_GB: f64 = 16.0;

/// GPU vendor as identified by the probing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuVendor::Nvidia => write!(f, "NVIDIA"),
            GpuVendor::Amd => write!(f, "AMD"),
            GpuVendor::Intel => write!(f, "Intel"),
        }
    }
}

/// One detected GPU. Memory is unknown for vendors probed by name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDescriptor {
    pub name: String,
    pub vendor: GpuVendor,
    pub total_memory_mb: Option<f64>,
    pub free_memory_mb: Option<f64>,
}

/// Point-in-time view of host resources.
///
/// A snapshot, never a live view: callers refresh it explicitly. A failed
/// probe leaves fields at zero instead of failing the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemProfile {
    pub total_memory_gb: f64,
    pub available_memory_gb: f64,
    /// Logical CPU count.
    pub cpu_cores: usize,
    #[serde(default)]
    pub gpus: Vec<GpuDescriptor>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub architecture: String,
}

impl SystemProfile {
    pub fn has_gpu(&self) -> bool {
        !self.gpus.is_empty()
    }

    /// Sum of reported GPU memory in GB (devices without a figure count as zero).
    pub fn gpu_memory_gb(&self) -> f64 {
        self.gpus
            .iter()
            .filter_map(|g| g.total_memory_mb)
            .sum::<f64>()
            / 1024.0
    }

    pub fn can_run_large_models(&self) -> bool {
        self.available_memory_gb > LARGE_MODEL_MEMORY_GB
    }

    /// CPU-only concurrency hint: half the cores, at least one.
    pub fn cpu_concurrency_hint(&self) -> usize {
        (self.cpu_cores / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpu(mb: Option<f64>) -> GpuDescriptor {
        GpuDescriptor {
            name: "test".into(),
            vendor: GpuVendor::Nvidia,
            total_memory_mb: mb,
            free_memory_mb: None,
        }
    }

    #[test]
    fn test_default_is_zeroed() {
        let profile = SystemProfile::default();
        assert_eq!(profile.cpu_cores, 0);
        assert!(!profile.has_gpu());
        assert!(!profile.can_run_large_models());
        assert_eq!(profile.cpu_concurrency_hint(), 1);
    }

    #[test]
    fn test_gpu_memory_sums_known_devices() {
        let profile = SystemProfile {
            gpus: vec![gpu(Some(8192.0)), gpu(None), gpu(Some(4096.0))],
            ..Default::default()
        };
        assert!(profile.has_gpu());
        assert_eq!(profile.gpu_memory_gb(), 12.0);
    }

    #[test]
    fn test_large_model_threshold() {
        let mut profile = SystemProfile {
            available_memory_gb: 16.0,
            ..Default::default()
        };
        assert!(!profile.can_run_large_models());
        profile.available_memory_gb = 16.5;
        assert!(profile.can_run_large_models());
    }
}
