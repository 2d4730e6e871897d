//! Streaming events for a single generate call.

use super::error::InferenceError;

/// An event in a streaming model response.
///
/// Bridges the backend's incremental frames to the application layer.
/// Exactly one terminal event (`Completed` or `Error`) ends a well-behaved
/// stream; a closed channel without one is treated as completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A non-empty text fragment.
    Delta(String),
    /// The backend marked the response as done.
    Completed,
    /// The call failed; no further events follow.
    Error(InferenceError),
}

impl StreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(!StreamEvent::Delta("hi".into()).is_terminal());
        assert!(StreamEvent::Completed.is_terminal());
        assert!(StreamEvent::Error(InferenceError::NoResponse).is_terminal());
    }
}
