//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are the only errors that cross the service boundary as hard
/// rejections. Per-model failures are carried inside results instead
/// (see [`InferenceError`](crate::inference::InferenceError)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No models selected")]
    NoModels,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Debate topic must not be empty")]
    EmptyTopic,

    #[error("A debate needs at least {min} participants, got {actual}")]
    TooFewParticipants { min: usize, actual: usize },

    #[error("A debate allows at most {max} participants, got {actual}")]
    TooManyParticipants { max: usize, actual: usize },

    #[error("Model {0} is listed more than once")]
    DuplicateParticipant(String),

    #[error("Round count must be between {min} and {max}, got {actual}")]
    InvalidRoundCount { min: u32, max: u32, actual: u32 },

    #[error("Invalid debate transition: {0}")]
    InvalidTransition(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
        assert!(error.is_cancelled());
    }

    #[test]
    fn test_round_count_message() {
        let error = DomainError::InvalidRoundCount {
            min: 2,
            max: 5,
            actual: 7,
        };
        assert_eq!(
            error.to_string(),
            "Round count must be between 2 and 5, got 7"
        );
        assert!(!error.is_cancelled());
    }
}
