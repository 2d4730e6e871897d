//! Scripted backends shared by the use case tests.

use crate::ports::inference_backend::{InferenceBackend, StreamHandle};
use async_trait::async_trait;
use palaver_domain::{InferenceError, ModelId, StreamEvent};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Backend whose answers are fixed per model.
///
/// Models without a scripted answer or failure say `"{model} says hi"`. Every prompt is
/// recorded so tests can inspect what each model saw.
#[derive(Default)]
pub struct ScriptedBackend {
    pub models: Vec<ModelId>,
    pub failures: HashMap<String, InferenceError>,
    pub answers: HashMap<String, String>,
    pub delay: Duration,
    pub list_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    pub fn with_models(names: &[&str]) -> Self {
        Self {
            models: names.iter().map(|n| ModelId::new(*n)).collect(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, model: &str, error: InferenceError) -> Self {
        self.failures.insert(model.to_string(), error);
        self
    }

    pub fn answering(mut self, model: &str, text: &str) -> Self {
        self.answers.insert(model.to_string(), text.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn prompts_for(&self, model: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == model)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn answer(model: &ModelId) -> String {
        format!("{model} says hi")
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn list_models(&self) -> Result<Vec<ModelId>, InferenceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.models.clone())
    }

    async fn generate(&self, model: &ModelId, prompt: &str) -> Result<String, InferenceError> {
        self.prompts
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = self.failures.get(model.as_str()) {
            return Err(err.clone());
        }
        Ok(self
            .answers
            .get(model.as_str())
            .cloned()
            .unwrap_or_else(|| Self::answer(model)))
    }

    async fn generate_stream(
        &self,
        model: &ModelId,
        prompt: &str,
    ) -> Result<StreamHandle, InferenceError> {
        let text = self.generate(model, prompt).await?;
        let (tx, rx) = mpsc::channel(16);
        for word in text.split_inclusive(' ') {
            let _ = tx.send(StreamEvent::Delta(word.to_string())).await;
        }
        let _ = tx.send(StreamEvent::Completed).await;
        Ok(StreamHandle::new(rx))
    }
}
