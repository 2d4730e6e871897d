//! Inference client
//!
//! Thin wrapper over [`InferenceBackend`] that turns every call into a
//! [`ModelResult`]. Failures never escape as errors here; they are recorded
//! in the result so a batch can carry partial success.

use crate::ports::event_sink::{EventSink, ForumEvent};
use crate::ports::inference_backend::InferenceBackend;
use palaver_domain::{ChunkEvent, InferenceError, ModelId, ModelResult, StreamEvent};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct InferenceClient {
    backend: Arc<dyn InferenceBackend>,
}

impl InferenceClient {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Models the backend serves. An unreachable backend yields an empty list.
    pub async fn list_models(&self) -> Vec<ModelId> {
        match self.try_list_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!("Failed to list models: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_list_models(&self) -> Result<Vec<ModelId>, InferenceError> {
        self.backend.list_models().await
    }

    /// Run `prompt` on `model` and wait for the whole answer.
    pub async fn query(&self, model: &ModelId, prompt: &str) -> ModelResult {
        let start = Instant::now();
        let outcome = self
            .backend
            .generate(model, prompt)
            .await
            .and_then(non_empty);
        finish(model, outcome, start)
    }

    /// Run `prompt` on `model`, forwarding text to `sink` as it arrives.
    ///
    /// Emits one `Chunk` per non-empty delta and exactly one final chunk with
    /// `done` set, whatever the outcome. The returned response is the
    /// concatenation of every delta.
    pub async fn query_streaming(
        &self,
        model: &ModelId,
        prompt: &str,
        sink: &dyn EventSink,
    ) -> ModelResult {
        let start = Instant::now();
        let outcome = match self.backend.generate_stream(model, prompt).await {
            Ok(mut handle) => {
                let mut text = String::new();
                let mut failure = None;
                while let Some(event) = handle.receiver.recv().await {
                    match event {
                        StreamEvent::Delta(delta) => {
                            if delta.is_empty() {
                                continue;
                            }
                            text.push_str(&delta);
                            sink.emit(ForumEvent::Chunk(ChunkEvent::delta(model.clone(), delta)));
                        }
                        StreamEvent::Completed => break,
                        StreamEvent::Error(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
                match failure {
                    Some(e) => Err(e),
                    None => non_empty(text),
                }
            }
            Err(e) => Err(e),
        };
        sink.emit(ForumEvent::Chunk(ChunkEvent::done(model.clone())));
        finish(model, outcome, start)
    }

    /// Dispatch to [`query_streaming`](Self::query_streaming) when `stream`
    /// is set and a sink is available, [`query`](Self::query) otherwise.
    pub async fn query_with(
        &self,
        model: &ModelId,
        prompt: &str,
        stream: bool,
        sink: Option<&dyn EventSink>,
    ) -> ModelResult {
        match (stream, sink) {
            (true, Some(sink)) => self.query_streaming(model, prompt, sink).await,
            _ => self.query(model, prompt).await,
        }
    }
}

fn non_empty(text: String) -> Result<String, InferenceError> {
    if text.trim().is_empty() {
        Err(InferenceError::NoResponse)
    } else {
        Ok(text)
    }
}

fn finish(model: &ModelId, outcome: Result<String, InferenceError>, start: Instant) -> ModelResult {
    let elapsed = start.elapsed().as_secs_f64();
    match outcome {
        Ok(text) => {
            debug!("Model {} answered in {:.2}s", model, elapsed);
            ModelResult::success(model.clone(), text, elapsed)
        }
        Err(e) => {
            warn!("Model {} failed: {}", model, e);
            ModelResult::failure(model.clone(), e, elapsed)
        }
    }
}
