//! Debate entry validation.

use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_ROUNDS: u32 = 2;
pub const MAX_ROUNDS: u32 = 5;
pub const MIN_PARTICIPANTS: usize = 2;

/// Limits checked before a debate dispatches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRules {
    pub max_participants: usize,
}

impl Default for DebateRules {
    fn default() -> Self {
        Self {
            max_participants: 4,
        }
    }
}

impl DebateRules {
    pub fn new(max_participants: usize) -> Self {
        Self { max_participants }
    }

    /// Validate a debate request.
    ///
    /// Rejects an empty topic, fewer than [`MIN_PARTICIPANTS`] or more than
    /// `max_participants` models, a model listed twice, and round counts
    /// outside `MIN_ROUNDS..=MAX_ROUNDS`.
    pub fn validate(
        &self,
        topic: &str,
        participants: &[ModelId],
        round_count: u32,
    ) -> Result<(), DomainError> {
        if topic.trim().is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        if participants.len() < MIN_PARTICIPANTS {
            return Err(DomainError::TooFewParticipants {
                min: MIN_PARTICIPANTS,
                actual: participants.len(),
            });
        }
        if participants.len() > self.max_participants {
            return Err(DomainError::TooManyParticipants {
                max: self.max_participants,
                actual: participants.len(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = participants.iter().find(|m| !seen.insert(*m)) {
            return Err(DomainError::DuplicateParticipant(dup.to_string()));
        }
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&round_count) {
            return Err(DomainError::InvalidRoundCount {
                min: MIN_ROUNDS,
                max: MAX_ROUNDS,
                actual: round_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ModelId> {
        names.iter().map(|n| ModelId::new(*n)).collect()
    }

    #[test]
    fn test_valid_request() {
        let rules = DebateRules::default();
        assert!(rules.validate("X", &ids(&["a", "b", "c"]), 2).is_ok());
        assert!(rules.validate("X", &ids(&["a", "b", "c", "d"]), 5).is_ok());
    }

    #[test]
    fn test_rejects_blank_topic() {
        let rules = DebateRules::default();
        assert_eq!(
            rules.validate("  ", &ids(&["a", "b"]), 3),
            Err(DomainError::EmptyTopic)
        );
    }

    #[test]
    fn test_participant_bounds() {
        let rules = DebateRules::default();
        assert!(matches!(
            rules.validate("X", &ids(&["a"]), 3),
            Err(DomainError::TooFewParticipants { min: 2, actual: 1 })
        ));
        assert!(matches!(
            rules.validate("X", &ids(&["a", "b", "c", "d", "e"]), 3),
            Err(DomainError::TooManyParticipants { max: 4, actual: 5 })
        ));
        assert!(
            DebateRules::new(6)
                .validate("X", &ids(&["a", "b", "c", "d", "e"]), 3)
                .is_ok()
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let rules = DebateRules::default();
        assert_eq!(
            rules.validate("X", &ids(&["a", "b", "a"]), 3),
            Err(DomainError::DuplicateParticipant("a".into()))
        );
    }

    #[test]
    fn test_round_bounds() {
        let rules = DebateRules::default();
        for rounds in [0, 1, 6] {
            assert!(matches!(
                rules.validate("X", &ids(&["a", "b"]), rounds),
                Err(DomainError::InvalidRoundCount { .. })
            ));
        }
    }
}
