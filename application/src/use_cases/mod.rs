//! Use cases (application services)

pub mod debate_orchestrator;
pub mod dispatch_query;
pub mod inference_client;
pub mod model_catalog;
pub mod resource_advisor;
pub mod summarize_debate;
