//! Error types for the Ollama adapter

use super::backend::OllamaConfig;
use palaver_domain::InferenceError;
use std::time::Instant;
use thiserror::Error;

/// Result type alias for Ollama adapter construction
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors raised while setting up the Ollama adapter.
///
/// Failures of individual calls are reported as [`InferenceError`] instead.
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Map a transport failure onto the inference error taxonomy.
///
/// reqwest does not say which limit fired, so a non-connect timeout that
/// struck before the total limit is attributed to the read timeout.
pub(crate) fn classify(
    err: &reqwest::Error,
    config: &OllamaConfig,
    started: Instant,
) -> InferenceError {
    if err.is_connect() && err.is_timeout() {
        InferenceError::timeout(config.connect_timeout)
    } else if err.is_connect() {
        InferenceError::Connection
    } else if err.is_timeout() {
        if started.elapsed() < config.request_timeout {
            InferenceError::timeout(config.read_timeout)
        } else {
            InferenceError::timeout(config.request_timeout)
        }
    } else if err.is_decode() {
        InferenceError::Malformed(err.to_string())
    } else {
        InferenceError::Transport(err.to_string())
    }
}
