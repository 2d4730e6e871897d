//! Model catalog
//!
//! Caches the backend's model list for a configurable time-to-live and
//! applies the selection policy before handing models out.

use super::inference_client::InferenceClient;
use crate::config::CatalogParams;
use palaver_domain::{ModelId, QuestionKind};
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{debug, warn};

struct CachedList {
    fetched_at: Instant,
    models: Arc<[ModelId]>,
}

pub struct ModelCatalog {
    client: InferenceClient,
    params: CatalogParams,
    cache: RwLock<Option<CachedList>>,
}

impl ModelCatalog {
    pub fn new(client: InferenceClient, params: CatalogParams) -> Self {
        Self {
            client,
            params,
            cache: RwLock::new(None),
        }
    }

    /// Admitted models, from cache unless it expired or `force_refresh` is set.
    ///
    /// A failed fetch yields an empty list and leaves the cache untouched.
    pub async fn list(&self, force_refresh: bool) -> Arc<[ModelId]> {
        if !force_refresh
            && let Some(models) = self.fresh()
        {
            debug!("Model list served from cache ({} models)", models.len());
            return models;
        }

        let fetched = match self.client.try_list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!("Failed to refresh model list: {}", e);
                return Arc::from(Vec::new());
            }
        };
        let admitted: Arc<[ModelId]> = self.params.policy.admit(fetched).into();
        debug!("Model list refreshed ({} models)", admitted.len());

        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(CachedList {
                fetched_at: Instant::now(),
                models: admitted.clone(),
            });
        }
        admitted
    }

    /// Models suited for a question of `kind`.
    pub async fn models_for(&self, kind: QuestionKind, force_refresh: bool) -> Vec<ModelId> {
        let available = self.list(force_refresh).await;
        self.params.policy.select_for(kind, &available)
    }

    fn fresh(&self) -> Option<Arc<[ModelId]>> {
        let cache = self.cache.read().ok()?;
        cache
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.params.cache_ttl)
            .map(|c| c.models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn catalog(backend: Arc<ScriptedBackend>, ttl: Duration) -> ModelCatalog {
        ModelCatalog::new(
            InferenceClient::new(backend),
            CatalogParams::default().with_cache_ttl(ttl),
        )
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let backend = Arc::new(ScriptedBackend::with_models(&["llama3", "mistral"]));
        let catalog = catalog(backend.clone(), Duration::from_secs(30));

        let first = catalog.list(false).await;
        let second = catalog.list(false).await;
        assert_eq!(first, second);
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_cache() {
        let backend = Arc::new(ScriptedBackend::with_models(&["llama3"]));
        let catalog = catalog(backend.clone(), Duration::from_secs(30));

        catalog.list(false).await;
        catalog.list(true).await;
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let backend = Arc::new(ScriptedBackend::with_models(&["llama3"]));
        let catalog = catalog(backend.clone(), Duration::ZERO);

        catalog.list(false).await;
        catalog.list(false).await;
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ultra_large_models_are_filtered() {
        let backend = Arc::new(ScriptedBackend::with_models(&["llama3:405b", "llama3:8b"]));
        let catalog = catalog(backend, Duration::from_secs(30));

        let models = catalog.list(false).await;
        assert_eq!(&*models, &[ModelId::new("llama3:8b")]);
    }
}
