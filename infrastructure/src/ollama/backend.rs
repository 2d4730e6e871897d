//! Ollama implementation of the inference backend port

use super::error::{OllamaError, Result, classify};
use super::protocol::{GenerateFrame, GenerateRequest, NdjsonDecoder, TagsResponse, parse_line};
use async_trait::async_trait;
use futures::StreamExt;
use palaver_application::{InferenceBackend, StreamHandle};
use palaver_domain::{InferenceError, ModelId, StreamEvent};
use reqwest::{Client, Response, StatusCode};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Where the Ollama server lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Idle time allowed between two reads of a response body
    pub read_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// [`InferenceBackend`] over the Ollama HTTP API.
pub struct OllamaBackend {
    client: Client,
    config: OllamaConfig,
}

impl OllamaBackend {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let parsed = reqwest::Url::parse(&config.base_url).map_err(|e| OllamaError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(OllamaError::InvalidUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, err: &reqwest::Error, started: Instant) -> InferenceError {
        classify(err, &self.config, started)
    }

    async fn post_generate(
        &self,
        model: &ModelId,
        prompt: &str,
        stream: bool,
        started: Instant,
    ) -> std::result::Result<Response, InferenceError> {
        let request = GenerateRequest {
            model: model.as_str(),
            prompt,
            stream,
        };
        debug!("POST /api/generate model={} stream={}", model, stream);
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e, started))?;
        check_status(response).await
    }
}

/// Turn a non-2xx answer into an error. 404 means the model is unknown.
async fn check_status(response: Response) -> std::result::Result<Response, InferenceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(InferenceError::ModelNotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(InferenceError::http_status(status.as_u16(), &body))
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn list_models(&self) -> std::result::Result<Vec<ModelId>, InferenceError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| self.transport_error(&e, started))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::http_status(status.as_u16(), &body));
        }
        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        Ok(tags.into_model_ids())
    }

    async fn generate(
        &self,
        model: &ModelId,
        prompt: &str,
    ) -> std::result::Result<String, InferenceError> {
        let started = Instant::now();
        let response = self.post_generate(model, prompt, false, started).await?;
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e, started))?;
        let frame: GenerateFrame =
            serde_json::from_str(&body).map_err(|e| InferenceError::Malformed(e.to_string()))?;
        match frame.error {
            Some(message) => Err(InferenceError::Backend(message)),
            None => Ok(frame.response),
        }
    }

    async fn generate_stream(
        &self,
        model: &ModelId,
        prompt: &str,
    ) -> std::result::Result<StreamHandle, InferenceError> {
        let started = Instant::now();
        let response = self.post_generate(model, prompt, true, started).await?;
        let (tx, rx) = mpsc::channel(64);
        let config = self.config.clone();
        let model = model.clone();

        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut decoder = NdjsonDecoder::default();

            while let Some(chunk) = body.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Stream from {} broke: {}", model, e);
                        let err = classify(&e, &config, started);
                        let _ = tx.send(StreamEvent::Error(err)).await;
                        return;
                    }
                };
                for line in decoder.push(&bytes) {
                    if forward_line(&line, &tx).await {
                        return;
                    }
                }
            }
            if let Some(line) = decoder.finish()
                && forward_line(&line, &tx).await
            {
                return;
            }
            // body ended without a done frame
            let _ = tx.send(StreamEvent::Completed).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

/// Send the events of one NDJSON line. Returns `true` once the stream is
/// finished, either by a terminal event or because the receiver is gone.
async fn forward_line(line: &str, tx: &mpsc::Sender<StreamEvent>) -> bool {
    let Some(frame) = parse_line(line) else {
        return false;
    };
    for event in frame.into_events() {
        let terminal = event.is_terminal();
        if tx.send(event).await.is_err() || terminal {
            return true;
        }
    }
    false
}
