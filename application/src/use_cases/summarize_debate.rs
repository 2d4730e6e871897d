//! Summarize debate use case
//!
//! Asks one model for a short synthesis of the debate. Any failure (no model
//! to ask, timeout, error, empty answer) degrades to the deterministic
//! fallback summary.

use super::inference_client::InferenceClient;
use palaver_domain::{
    Argument, ModelId, PromptTemplate, SummaryResult, choose_summary_model, fallback_summary,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub struct SummarizeDebateUseCase {
    client: InferenceClient,
    preferences: Vec<String>,
    timeout: Duration,
}

impl SummarizeDebateUseCase {
    pub fn new(client: InferenceClient, preferences: Vec<String>, timeout: Duration) -> Self {
        Self {
            client,
            preferences,
            timeout,
        }
    }

    pub async fn summarize(
        &self,
        topic: &str,
        arguments: &[Argument],
        participants: &[ModelId],
        available: &[ModelId],
    ) -> SummaryResult {
        let Some(model) =
            choose_summary_model(participants, arguments, &self.preferences, available)
        else {
            warn!("No model available for the summary, using fallback");
            return self.fallback(topic, arguments, participants);
        };

        info!("Summarizing debate with {}", model);
        let prompt = PromptTemplate::debate_summary(topic, arguments);
        match timeout(self.timeout, self.client.query(&model, &prompt)).await {
            Ok(result) if result.is_success() => SummaryResult::from_model(model, result.response),
            Ok(result) => {
                warn!(
                    "Summary model {} failed: {}",
                    model,
                    result.error_message().unwrap_or_default()
                );
                self.fallback(topic, arguments, participants)
            }
            Err(_) => {
                warn!(
                    "Summary model {} timed out after {:?}",
                    model, self.timeout
                );
                self.fallback(topic, arguments, participants)
            }
        }
    }

    fn fallback(&self, topic: &str, arguments: &[Argument], participants: &[ModelId]) -> SummaryResult {
        SummaryResult::from_fallback(fallback_summary(topic, arguments, participants))
    }
}
