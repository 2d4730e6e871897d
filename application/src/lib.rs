//! Application layer for palaver
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod service;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{CatalogParams, DebateParams, DispatchParams, ForumConfig};
pub use ports::{
    event_sink::{ChannelSink, CompositeSink, EventSink, ForumEvent, NoEvents},
    inference_backend::{InferenceBackend, StreamHandle},
    system_probe::{FixedProbe, SystemProbe},
};
pub use service::{DebateHandle, ForumService, SessionId, SessionStore};
pub use use_cases::debate_orchestrator::{DebateOrchestrator, DebateRecord};
pub use use_cases::dispatch_query::DispatchQueryUseCase;
pub use use_cases::inference_client::InferenceClient;
pub use use_cases::model_catalog::ModelCatalog;
pub use use_cases::resource_advisor::ResourceAdvisor;
pub use use_cases::summarize_debate::SummarizeDebateUseCase;
