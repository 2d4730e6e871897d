//! Ollama adapter
//!
//! Talks to an Ollama server over HTTP: `GET /api/tags` for the model list
//! and `POST /api/generate` for whole or streamed (NDJSON) answers.

pub mod backend;
pub mod error;
pub mod protocol;

pub use backend::{OllamaBackend, OllamaConfig};
pub use error::OllamaError;
