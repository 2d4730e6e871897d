//! Ollama wire types
//!
//! `GET /api/tags` lists models; `POST /api/generate` runs a prompt and
//! answers either with one JSON object or, when streaming, with one JSON
//! object per line (NDJSON).

use palaver_domain::{InferenceError, ModelId, StreamEvent};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TagEntry {
    pub name: String,
}

impl TagsResponse {
    pub fn into_model_ids(self) -> Vec<ModelId> {
        self.models.into_iter().map(|m| ModelId::new(m.name)).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// One generate reply, or one line of a streamed reply.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateFrame {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateFrame {
    /// Events carried by this frame, in order.
    pub fn into_events(self) -> Vec<StreamEvent> {
        if let Some(message) = self.error {
            return vec![StreamEvent::Error(InferenceError::Backend(message))];
        }
        let mut events = Vec::with_capacity(2);
        if !self.response.is_empty() {
            events.push(StreamEvent::Delta(self.response));
        }
        if self.done {
            events.push(StreamEvent::Completed);
        }
        events
    }
}

/// Parse one NDJSON line. Blank and malformed lines yield nothing.
pub fn parse_line(line: &str) -> Option<GenerateFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(frame) => Some(frame),
        Err(e) => {
            debug!("Skipping malformed stream frame: {}", e);
            None
        }
    }
}

/// Splits a byte stream into complete lines.
///
/// Network chunks may end mid-line or mid UTF-8 sequence, so bytes are
/// buffered until a newline arrives.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    /// Feed a chunk and take every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// The trailing line left when the stream ends without a newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
