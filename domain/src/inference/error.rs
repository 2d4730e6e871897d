//! Classified per-model inference failures.

use crate::core::string::truncate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Maximum number of body bytes kept when the backend answers with a non-2xx status.
pub const STATUS_BODY_LIMIT: usize = 200;

/// Why a single model call failed.
///
/// Failures never escape the inference client as errors; they are stored in
/// the model's [`ModelResult`](super::ModelResult) so a batch can carry
/// partial success.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InferenceError {
    /// The backend answered 404 for the requested model.
    #[error("model not found")]
    ModelNotFound,

    /// Any other non-2xx answer. `body` is already truncated.
    #[error("backend returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The backend could not be reached at all.
    #[error("cannot connect to backend")]
    Connection,

    /// Connect, read or total timeout elapsed. Carries the limit that fired.
    #[error("request timed out after {}s", as_secs(.millis))]
    Timeout { millis: u64 },

    /// The backend embedded an `error` field in an otherwise valid reply.
    #[error("{0}")]
    Backend(String),

    /// The call finished without producing any text.
    #[error("no response received")]
    NoResponse,

    /// A whole (non-streamed) reply could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Transport failure that is neither a refused connection nor a timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller stopped the operation before this call was dispatched.
    #[error("cancelled before dispatch")]
    Cancelled,
}

impl InferenceError {
    /// Build an [`InferenceError::HttpStatus`], truncating the body.
    pub fn http_status(status: u16, body: &str) -> Self {
        Self::HttpStatus {
            status,
            body: truncate(body.trim(), STATUS_BODY_LIMIT),
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

fn as_secs(millis: &u64) -> f64 {
    *millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(InferenceError::ModelNotFound.to_string(), "model not found");
        assert_eq!(
            InferenceError::Connection.to_string(),
            "cannot connect to backend"
        );
        assert_eq!(
            InferenceError::NoResponse.to_string(),
            "no response received"
        );
        assert_eq!(
            InferenceError::timeout(Duration::from_secs(60)).to_string(),
            "request timed out after 60s"
        );
        assert_eq!(
            InferenceError::Backend("out of memory".into()).to_string(),
            "out of memory"
        );
    }

    #[test]
    fn test_http_status_truncates_body() {
        let body = "x".repeat(500);
        let err = InferenceError::http_status(500, &body);
        let InferenceError::HttpStatus { status, body } = &err else {
            panic!("expected HttpStatus");
        };
        assert_eq!(*status, 500);
        assert_eq!(body.len(), STATUS_BODY_LIMIT);
        assert!(err.to_string().starts_with("backend returned HTTP 500: xxx"));
    }

    #[test]
    fn test_sub_second_timeout_keeps_its_value() {
        let err = InferenceError::timeout(Duration::from_millis(250));
        assert_eq!(err, InferenceError::Timeout { millis: 250 });
        assert_eq!(err.to_string(), "request timed out after 0.25s");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(InferenceError::timeout(Duration::from_secs(5))).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["millis"], 5000);
    }
}
