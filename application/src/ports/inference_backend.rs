//! Inference backend port
//!
//! Defines the interface for talking to the model-serving backend.

use async_trait::async_trait;
use palaver_domain::{InferenceError, ModelId, StreamEvent};
use tokio::sync::mpsc;

/// Backend that lists and runs models
///
/// This port defines how the application layer reaches the inference server.
/// Implementations (adapters) live in the infrastructure layer. Every method
/// reports failures as a classified [`InferenceError`].
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Models the backend currently serves, in backend order
    async fn list_models(&self) -> Result<Vec<ModelId>, InferenceError>;

    /// Run `prompt` on `model` and return the whole response text
    async fn generate(&self, model: &ModelId, prompt: &str) -> Result<String, InferenceError>;

    /// Run `prompt` on `model`, yielding text as it is produced.
    ///
    /// Default implementation calls `generate()` and replays the result as a
    /// single delta followed by `Completed`.
    async fn generate_stream(
        &self,
        model: &ModelId,
        prompt: &str,
    ) -> Result<StreamHandle, InferenceError> {
        let text = self.generate(model, prompt).await?;
        let (tx, rx) = mpsc::channel(2);
        // receiver may already be gone; nothing to do then
        if !text.is_empty() {
            let _ = tx.send(StreamEvent::Delta(text)).await;
        }
        let _ = tx.send(StreamEvent::Completed).await;
        Ok(StreamHandle::new(rx))
    }
}

/// Handle for receiving streaming events from one generate call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    ///
    /// A channel that closes without a terminal event counts as completed.
    pub async fn collect_text(mut self) -> Result<String, InferenceError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed => break,
                StreamEvent::Error(e) => return Err(e),
            }
        }
        Ok(full_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoBackend;

    #[async_trait]
    impl InferenceBackend for EchoBackend {
        async fn list_models(&self) -> Result<Vec<ModelId>, InferenceError> {
            Ok(vec![ModelId::new("echo")])
        }

        async fn generate(&self, _model: &ModelId, prompt: &str) -> Result<String, InferenceError> {
            if prompt == "fail" {
                return Err(InferenceError::ModelNotFound);
            }
            Ok(prompt.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_default_stream_replays_generate() {
        let handle = EchoBackend
            .generate_stream(&ModelId::new("echo"), "hello")
            .await
            .unwrap();
        assert_eq!(handle.collect_text().await.unwrap(), "HELLO");
    }

    #[tokio::test]
    async fn test_default_stream_propagates_error() {
        let result = EchoBackend
            .generate_stream(&ModelId::new("echo"), "fail")
            .await;
        assert!(matches!(result, Err(InferenceError::ModelNotFound)));
    }

    #[tokio::test]
    async fn test_collect_text_stops_at_error() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(StreamEvent::Delta("partial".into())).await.unwrap();
        tx.send(StreamEvent::Error(InferenceError::Backend("boom".into())))
            .await
            .unwrap();
        drop(tx);
        let err = StreamHandle::new(rx).collect_text().await.unwrap_err();
        assert_eq!(err, InferenceError::Backend("boom".into()));
    }
}
