//! Resource estimation: host snapshot, per-model footprint and admission planning.
//!
//! Everything here is pure. Probing the host is an application port
//! (`SystemProbe`); this module only reasons about the snapshot it returns.

pub mod estimate;
pub mod planner;
pub mod profile;

pub use estimate::{ModelCategory, ModelResourceEstimate, estimate};
pub use planner::{recommend_concurrency, should_run_sequentially, MAX_RECOMMENDED_CONCURRENCY};
pub use profile::{GpuDescriptor, GpuVendor, SystemProfile};
