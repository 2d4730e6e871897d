//! Host inspection
//!
//! Provides [`HostProbe`], the [`SystemProbe`](palaver_application::SystemProbe)
//! adapter that reads memory, CPU and GPU information from the machine.

mod host_probe;

pub use host_probe::HostProbe;
