//! Admission planning: how many models to run at once, and which ones fit.

use super::estimate::{ModelResourceEstimate, estimate};
use super::profile::SystemProfile;
use crate::core::model::ModelId;

/// Hard cap on recommended concurrency regardless of hardware.
pub const MAX_RECOMMENDED_CONCURRENCY: usize = 6;

/// Share of available memory treated as usable for models.
const USABLE_MEMORY_SHARE: f64 = 0.7;

/// Share of available memory above which models should run one at a time.
const SEQUENTIAL_MEMORY_SHARE: f64 = 0.8;

/// Models kept when nothing fits comfortably.
const FALLBACK_MODEL_COUNT: usize = 3;

/// Recommend a concurrency level and the models that fit comfortably.
///
/// Candidates are ordered by ascending estimated size (ties by name). The
/// concurrency is bounded by how many of the smallest model fit in 70% of
/// available memory, by half the CPU cores, and by
/// [`MAX_RECOMMENDED_CONCURRENCY`], and is never below one. If no model fits
/// within its share of the budget, the three smallest are returned with a
/// concurrency of one.
///
/// ```
/// use palaver_domain::resources::{SystemProfile, recommend_concurrency};
///
/// assert_eq!(recommend_concurrency(&SystemProfile::default(), &[]), (1, vec![]));
/// ```
pub fn recommend_concurrency(
    profile: &SystemProfile,
    models: &[ModelId],
) -> (usize, Vec<ModelId>) {
    if models.is_empty() {
        return (1, Vec::new());
    }

    let mut estimates: Vec<ModelResourceEstimate> = models.iter().map(estimate).collect();
    estimates.sort_by(|a, b| {
        a.size_gb
            .total_cmp(&b.size_gb)
            .then_with(|| a.model.cmp(&b.model))
    });

    let usable = profile.available_memory_gb * USABLE_MEMORY_SHARE;
    let smallest = &estimates[0];
    let by_memory = ((usable / smallest.recommended_ram_gb).floor() as usize).max(1);
    let by_cpu = profile.cpu_concurrency_hint();
    let mut concurrency = by_memory.min(by_cpu).min(MAX_RECOMMENDED_CONCURRENCY);

    let per_model_budget = usable / concurrency as f64;
    let mut fits: Vec<ModelId> = estimates
        .iter()
        .filter(|e| e.recommended_ram_gb <= per_model_budget)
        .map(|e| e.model.clone())
        .collect();

    if fits.is_empty() {
        fits = estimates
            .iter()
            .take(FALLBACK_MODEL_COUNT)
            .map(|e| e.model.clone())
            .collect();
        concurrency = 1;
    }

    (concurrency, fits)
}

/// True when the summed minimum RAM exceeds 80% of available memory.
pub fn should_run_sequentially(profile: &SystemProfile, models: &[ModelId]) -> bool {
    let required: f64 = models.iter().map(|m| estimate(m).min_ram_gb).sum();
    required > profile.available_memory_gb * SEQUENTIAL_MEMORY_SHARE
}
