//! Host probe using `sysinfo` and vendor GPU tools.
//!
//! Memory comes from `sysinfo`, the CPU count from the standard library.
//! GPUs are found by running vendor tools when they are installed:
//! `nvidia-smi` everywhere, `lspci` on Linux and `wmic` on Windows. Every
//! failure degrades to an empty or zeroed field.

use async_trait::async_trait;
use palaver_application::SystemProbe;
use palaver_domain::resources::{GpuDescriptor, GpuVendor, SystemProfile};
use std::time::Duration;
use sysinfo::System;
use tokio::process::Command;
use tracing::debug;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const NVIDIA_SMI_TIMEOUT: Duration = Duration::from_secs(10);
const NAME_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads resources of the machine the process runs on.
#[derive(Debug, Default)]
pub struct HostProbe;

impl HostProbe {
    pub fn new() -> Self {
        Self
    }

    async fn detect_gpus() -> Vec<GpuDescriptor> {
        let mut gpus = Vec::new();

        if let Some(out) = run_tool(
            "nvidia-smi",
            &[
                "--query-gpu=name,memory.total,memory.free",
                "--format=csv,noheader,nounits",
            ],
            NVIDIA_SMI_TIMEOUT,
        )
        .await
        {
            gpus.extend(parse_nvidia_smi(&out));
        }

        if cfg!(target_os = "linux")
            && let Some(out) = run_tool("lspci", &[], NAME_PROBE_TIMEOUT).await
            && lspci_reports_amd_gpu(&out)
        {
            gpus.push(named_only("AMD GPU (detected)", GpuVendor::Amd));
        }

        if cfg!(target_os = "windows")
            && let Some(out) = run_tool(
                "wmic",
                &["path", "win32_VideoController", "get", "name"],
                NAME_PROBE_TIMEOUT,
            )
            .await
            && out.contains("Intel")
        {
            gpus.push(named_only("Intel GPU (detected)", GpuVendor::Intel));
        }

        gpus
    }
}

#[async_trait]
impl SystemProbe for HostProbe {
    async fn detect(&self) -> SystemProfile {
        let memory = tokio::task::spawn_blocking(|| {
            let mut sys = System::new();
            sys.refresh_memory();
            (sys.total_memory(), sys.available_memory())
        })
        .await;
        let (total, available) = match memory {
            Ok(pair) => pair,
            Err(e) => {
                debug!("Memory probe failed: {}", e);
                (0, 0)
            }
        };

        let cpu_cores = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(0);

        SystemProfile {
            total_memory_gb: bytes_to_gb(total),
            available_memory_gb: bytes_to_gb(available),
            cpu_cores,
            gpus: Self::detect_gpus().await,
            platform: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
        }
    }
}

fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

fn named_only(name: &str, vendor: GpuVendor) -> GpuDescriptor {
    GpuDescriptor {
        name: name.to_string(),
        vendor,
        total_memory_mb: None,
        free_memory_mb: None,
    }
}

/// Run `program` if it is installed, returning stdout on success.
async fn run_tool(program: &str, args: &[&str], limit: Duration) -> Option<String> {
    if which::which(program).is_err() {
        debug!("{} not found, skipping", program);
        return None;
    }

    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);
    match tokio::time::timeout(limit, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(Ok(output)) => {
            debug!("{} exited with {}", program, output.status);
            None
        }
        Ok(Err(e)) => {
            debug!("Failed to execute {}: {}", program, e);
            None
        }
        Err(_) => {
            debug!("{} timed out after {:?}", program, limit);
            None
        }
    }
}

/// Parse `name, total MiB, free MiB` rows. Rows that do not parse are skipped.
fn parse_nvidia_smi(output: &str) -> Vec<GpuDescriptor> {
    output
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            let [name, total, free, ..] = parts.as_slice() else {
                return None;
            };
            Some(GpuDescriptor {
                name: name.to_string(),
                vendor: GpuVendor::Nvidia,
                total_memory_mb: Some(total.parse().ok()?),
                free_memory_mb: Some(free.parse().ok()?),
            })
        })
        .collect()
}

fn lspci_reports_amd_gpu(output: &str) -> bool {
    output.contains("AMD") && (output.contains("Radeon") || output.contains("GPU"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nvidia_smi() {
        let out = "NVIDIA GeForce RTX 4090, 24564, 23000\nbroken line\nTesla T4, 15360, n/a\n";
        let gpus = parse_nvidia_smi(out);
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].name, "NVIDIA GeForce RTX 4090");
        assert_eq!(gpus[0].total_memory_mb, Some(24564.0));
        assert_eq!(gpus[0].free_memory_mb, Some(23000.0));
    }

    #[test]
    fn test_lspci_amd_detection() {
        assert!(lspci_reports_amd_gpu(
            "03:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD/ATI] Navi 21 [Radeon RX 6800]"
        ));
        assert!(!lspci_reports_amd_gpu("00:02.0 VGA compatible controller: Intel Corporation UHD"));
    }

    #[tokio::test]
    async fn test_detect_reports_host_basics() {
        let profile = HostProbe::new().detect().await;
        assert!(profile.cpu_cores >= 1);
        assert!(profile.total_memory_gb >= profile.available_memory_gb);
        assert_eq!(profile.platform, std::env::consts::OS);
    }

    #[tokio::test]
    async fn test_missing_tool_yields_none() {
        assert!(
            run_tool("palaver-no-such-tool", &[], Duration::from_secs(1))
                .await
                .is_none()
        );
    }
}
