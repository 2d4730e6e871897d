//! Inference value objects - immutable request and result types.
//!
//! - [`QueryRequest`] - a validated fan-out request (prompt, targets, concurrency)
//! - [`ModelResult`] - one model's outcome, successful iff `error` is absent
//! - [`ChunkEvent`] - one streamed fragment, tagged with its model
//! - [`QuestionKind`] - general or coding question, drives model selection

use super::error::InferenceError;
use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of querying a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// The model that was queried
    pub model: ModelId,
    /// Response text; empty when the call failed
    pub response: String,
    /// Wall-clock seconds from call start to completion
    pub elapsed_secs: f64,
    /// Classified failure, absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<InferenceError>,
}

impl ModelResult {
    /// Creates a successful result.
    pub fn success(model: ModelId, response: impl Into<String>, elapsed_secs: f64) -> Self {
        Self {
            model,
            response: response.into(),
            elapsed_secs: elapsed_secs.max(0.0),
            error: None,
        }
    }

    /// Creates a failed result with an empty response.
    pub fn failure(model: ModelId, error: InferenceError, elapsed_secs: f64) -> Self {
        Self {
            model,
            response: String::new(),
            elapsed_secs: elapsed_secs.max(0.0),
            error: Some(error),
        }
    }

    /// Returns `true` if the model answered.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Human-readable failure reason, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// A prompt to fan out across several models.
///
/// Built through [`QueryRequest::new`], which enforces that the effective
/// concurrency never exceeds the global ceiling or the number of targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    prompt: String,
    models: Vec<ModelId>,
    concurrency: usize,
    stream: bool,
}

impl QueryRequest {
    /// Validate and build a request.
    ///
    /// `requested` is the caller's concurrency limit, `ceiling` the globally
    /// configured maximum. The effective value is clamped to
    /// `1..=min(ceiling, models.len())`.
    ///
    /// # Example
    ///
    /// ```
    /// use palaver_domain::{ModelId, QueryRequest};
    ///
    /// let models = vec![ModelId::new("a"), ModelId::new("b")];
    /// let request = QueryRequest::new("hi", models, 8, true, 5).unwrap();
    /// assert_eq!(request.concurrency(), 2);
    /// ```
    pub fn new(
        prompt: impl Into<String>,
        models: Vec<ModelId>,
        requested: usize,
        stream: bool,
        ceiling: usize,
    ) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        if models.is_empty() {
            return Err(DomainError::NoModels);
        }
        let concurrency = requested.min(ceiling).min(models.len()).max(1);
        Ok(Self {
            prompt,
            models,
            concurrency,
            stream,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// Effective number of models queried at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn is_streaming(&self) -> bool {
        self.stream
    }
}

/// One incremental fragment of a streamed response.
///
/// Every streamed model ends with exactly one event where `done` is true and
/// `text` is empty, whether or not the call succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkEvent {
    pub model: ModelId,
    pub text: String,
    pub done: bool,
}

impl ChunkEvent {
    pub fn delta(model: ModelId, text: impl Into<String>) -> Self {
        Self {
            model,
            text: text.into(),
            done: false,
        }
    }

    pub fn done(model: ModelId) -> Self {
        Self {
            model,
            text: String::new(),
            done: true,
        }
    }
}

/// What kind of question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    General,
    Coding,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::General => write!(f, "general"),
            QuestionKind::Coding => write!(f, "coding"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(n: usize) -> Vec<ModelId> {
        (0..n).map(|i| ModelId::new(format!("m{i}"))).collect()
    }

    #[test]
    fn test_concurrency_clamped_to_ceiling_and_targets() {
        let request = QueryRequest::new("q", models(10), 8, false, 5).unwrap();
        assert_eq!(request.concurrency(), 5);

        let request = QueryRequest::new("q", models(3), 8, false, 5).unwrap();
        assert_eq!(request.concurrency(), 3);

        let request = QueryRequest::new("q", models(3), 2, false, 5).unwrap();
        assert_eq!(request.concurrency(), 2);
    }

    #[test]
    fn test_concurrency_floored_at_one() {
        let request = QueryRequest::new("q", models(3), 0, false, 5).unwrap();
        assert_eq!(request.concurrency(), 1);
    }

    #[test]
    fn test_rejects_empty_prompt_and_targets() {
        assert_eq!(
            QueryRequest::new("   ", models(2), 2, false, 5).unwrap_err(),
            DomainError::EmptyPrompt
        );
        assert_eq!(
            QueryRequest::new("q", vec![], 2, false, 5).unwrap_err(),
            DomainError::NoModels
        );
    }

    #[test]
    fn test_model_result_success_flag() {
        let ok = ModelResult::success(ModelId::new("a"), "text", 1.5);
        assert!(ok.is_success());
        assert_eq!(ok.error_message(), None);

        let failed = ModelResult::failure(ModelId::new("b"), InferenceError::ModelNotFound, -1.0);
        assert!(!failed.is_success());
        assert!(failed.response.is_empty());
        assert_eq!(failed.elapsed_secs, 0.0);
        assert_eq!(failed.error_message().as_deref(), Some("model not found"));
    }

    #[test]
    fn test_chunk_event_constructors() {
        let done = ChunkEvent::done(ModelId::new("a"));
        assert!(done.done);
        assert!(done.text.is_empty());
        assert!(!ChunkEvent::delta(ModelId::new("a"), "x").done);
    }
}
