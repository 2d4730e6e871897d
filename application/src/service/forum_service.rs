//! Forum service
//!
//! Facade over the use cases. Callers identify themselves with a
//! [`SessionId`]; debates and cancellation are scoped to that session.

use super::session_store::{DebateHandle, SessionId, SessionStore};
use crate::config::ForumConfig;
use crate::ports::event_sink::EventSink;
use crate::ports::inference_backend::InferenceBackend;
use crate::ports::system_probe::SystemProbe;
use crate::use_cases::debate_orchestrator::DebateOrchestrator;
use crate::use_cases::dispatch_query::DispatchQueryUseCase;
use crate::use_cases::inference_client::InferenceClient;
use crate::use_cases::model_catalog::ModelCatalog;
use crate::use_cases::resource_advisor::ResourceAdvisor;
use palaver_domain::{
    ConsensusReport, DebateSession, DomainError, ModelId, ModelResourceEstimate, ModelResult,
    QueryRequest, QuestionKind, SummaryResult, SystemProfile,
};
use std::sync::Arc;
use tracing::info;

pub struct ForumService {
    config: ForumConfig,
    catalog: ModelCatalog,
    dispatcher: DispatchQueryUseCase,
    orchestrator: DebateOrchestrator,
    advisor: ResourceAdvisor,
    sessions: SessionStore,
}

impl ForumService {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        probe: Arc<dyn SystemProbe>,
        config: ForumConfig,
    ) -> Self {
        let client = InferenceClient::new(backend);
        Self {
            catalog: ModelCatalog::new(client.clone(), config.catalog.clone()),
            dispatcher: DispatchQueryUseCase::new(client.clone()),
            orchestrator: DebateOrchestrator::new(client, &config.debate),
            advisor: ResourceAdvisor::new(probe),
            sessions: SessionStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &ForumConfig {
        &self.config
    }

    // ==================== Models ====================

    /// Models the backend serves, with the size filter applied.
    pub async fn list_models(&self, force_refresh: bool) -> Vec<ModelId> {
        self.catalog.list(force_refresh).await.to_vec()
    }

    pub async fn models_for(&self, kind: QuestionKind, force_refresh: bool) -> Vec<ModelId> {
        self.catalog.models_for(kind, force_refresh).await
    }

    // ==================== Queries ====================

    /// Build a request bounded by the configured concurrency ceiling.
    ///
    /// `concurrency` falls back to the configured default when `None`.
    pub fn build_request(
        &self,
        prompt: impl Into<String>,
        models: Vec<ModelId>,
        concurrency: Option<usize>,
        stream: bool,
    ) -> Result<QueryRequest, DomainError> {
        let dispatch = &self.config.dispatch;
        QueryRequest::new(
            prompt,
            models,
            concurrency.unwrap_or(dispatch.default_concurrency),
            stream,
            dispatch.max_concurrent_requests,
        )
    }

    /// Send the request to every model. Always one result per model.
    pub async fn dispatch_query(
        &self,
        session: &SessionId,
        request: &QueryRequest,
        sink: Option<&dyn EventSink>,
    ) -> Vec<ModelResult> {
        let cancel = self.sessions.operation_token(session);
        self.dispatcher.execute(request, sink, &cancel).await
    }

    // ==================== Debates ====================

    /// Validate and run a debate to completion or cancellation.
    ///
    /// The request is rejected before anything is dispatched when it breaks
    /// the debate rules. Cancellation is not an error: the debate stays
    /// readable through the returned handle.
    pub async fn start_debate(
        &self,
        session: &SessionId,
        topic: &str,
        participants: Vec<ModelId>,
        round_count: u32,
        sink: &dyn EventSink,
    ) -> Result<DebateHandle, DomainError> {
        let debate = DebateSession::start(topic, participants, round_count, &self.config.debate.rules)?;
        let handle = DebateHandle {
            session: session.clone(),
            debate_id: debate.id().to_string(),
        };
        let record = self.sessions.install_debate(session, debate);

        let available = self.catalog.list(false).await;
        let phase = self.orchestrator.run(&record, &available, sink).await?;
        info!("Debate {} ended as {}", handle.debate_id, phase);
        Ok(handle)
    }

    pub async fn get_summary(&self, handle: &DebateHandle) -> Option<SummaryResult> {
        self.sessions.debate(handle).await?.summary().await
    }

    pub async fn get_consensus(&self, handle: &DebateHandle) -> Option<ConsensusReport> {
        Some(self.sessions.debate(handle).await?.consensus().await)
    }

    pub async fn debate_snapshot(&self, handle: &DebateHandle) -> Option<DebateSession> {
        Some(self.sessions.debate(handle).await?.snapshot().await)
    }

    /// Stop everything `session` is running. Returns `false` for unknown sessions.
    pub fn cancel(&self, session: &SessionId) -> bool {
        info!("Cancelling session {}", session);
        self.sessions.cancel(session)
    }

    // ==================== Resources ====================

    /// Probe the host again and return the fresh profile.
    pub async fn estimate_resources(&self) -> SystemProfile {
        (*self.advisor.refresh().await).clone()
    }

    pub fn estimate_model(&self, model: &ModelId) -> ModelResourceEstimate {
        self.advisor.estimate(model)
    }

    pub async fn recommend_concurrency(&self, models: &[ModelId]) -> (usize, Vec<ModelId>) {
        self.advisor.recommend_concurrency(models).await
    }

    pub async fn should_run_sequentially(&self, models: &[ModelId]) -> bool {
        self.advisor.should_run_sequentially(models).await
    }
}
