//! Resource advisor
//!
//! Holds the last host snapshot and answers sizing questions against it.
//! The snapshot is only refreshed on request; estimates never fail.

use crate::ports::system_probe::SystemProbe;
use palaver_domain::resources::{self, ModelResourceEstimate, SystemProfile};
use palaver_domain::ModelId;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub struct ResourceAdvisor {
    probe: Arc<dyn SystemProbe>,
    snapshot: RwLock<Option<Arc<SystemProfile>>>,
}

impl ResourceAdvisor {
    pub fn new(probe: Arc<dyn SystemProbe>) -> Self {
        Self {
            probe,
            snapshot: RwLock::new(None),
        }
    }

    /// Probe the host again and replace the snapshot.
    pub async fn refresh(&self) -> Arc<SystemProfile> {
        let profile = Arc::new(self.probe.detect().await);
        debug!(
            "Host profile: {:.1}/{:.1} GB free, {} cores, {} GPUs",
            profile.available_memory_gb,
            profile.total_memory_gb,
            profile.cpu_cores,
            profile.gpus.len()
        );
        *self.snapshot.write().await = Some(profile.clone());
        profile
    }

    /// Last snapshot, probing once if none exists yet.
    pub async fn profile(&self) -> Arc<SystemProfile> {
        if let Some(profile) = self.snapshot.read().await.as_ref() {
            return profile.clone();
        }
        self.refresh().await
    }

    pub fn estimate(&self, model: &ModelId) -> ModelResourceEstimate {
        resources::estimate(model)
    }

    pub async fn recommend_concurrency(&self, models: &[ModelId]) -> (usize, Vec<ModelId>) {
        let profile = self.profile().await;
        resources::recommend_concurrency(&profile, models)
    }

    pub async fn should_run_sequentially(&self, models: &[ModelId]) -> bool {
        let profile = self.profile().await;
        resources::should_run_sequentially(&profile, models)
    }
}
