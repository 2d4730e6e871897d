//! Debate synthesis: the summary result, model choice and the local fallback.

mod fallback;

pub use fallback::fallback_summary;

use crate::core::model::ModelId;
use crate::debate::Argument;
use serde::{Deserialize, Serialize};

/// Models tried for the summary when no participant argued.
pub const DEFAULT_SUMMARY_PREFERENCES: &[&str] =
    &["gpt-4", "claude-3-sonnet", "gpt-3.5-turbo", "claude-3-haiku"];

/// Final natural-language summary of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Model that wrote the summary; `None` for the local fallback
    pub model: Option<ModelId>,
    pub text: String,
    pub success: bool,
    /// Produced locally because the model call failed, timed out or was skipped
    pub fallback: bool,
}

impl SummaryResult {
    pub fn from_model(model: ModelId, text: impl Into<String>) -> Self {
        Self {
            model: Some(model),
            text: text.into(),
            success: true,
            fallback: false,
        }
    }

    /// Wrap a locally computed summary. The fallback cannot fail, so it is
    /// reported as successful.
    pub fn from_fallback(text: impl Into<String>) -> Self {
        Self {
            model: None,
            text: text.into(),
            success: true,
            fallback: true,
        }
    }
}

/// Pick the model that writes the summary.
///
/// Preference order: the first participant that recorded an argument, then
/// the first entry of `preferences` present in `available`, then the first
/// available model.
pub fn choose_summary_model<S: AsRef<str>>(
    participants: &[ModelId],
    arguments: &[Argument],
    preferences: &[S],
    available: &[ModelId],
) -> Option<ModelId> {
    participants
        .iter()
        .find(|p| arguments.iter().any(|a| &a.model == *p))
        .or_else(|| {
            preferences
                .iter()
                .find_map(|pref| available.iter().find(|m| m.as_str() == pref.as_ref()))
        })
        .or_else(|| available.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ModelId> {
        names.iter().map(|n| ModelId::new(*n)).collect()
    }

    #[test]
    fn test_prefers_participant_that_argued() {
        let participants = ids(&["a", "b"]);
        let args = vec![Argument::new(1, ModelId::new("b"), "text")];
        let chosen =
            choose_summary_model(&participants, &args, DEFAULT_SUMMARY_PREFERENCES, &ids(&["z"]));
        assert_eq!(chosen, Some(ModelId::new("b")));
    }

    #[test]
    fn test_falls_back_to_preference_list_then_first_available() {
        let participants = ids(&["a", "b"]);
        let chosen = choose_summary_model(
            &participants,
            &[],
            DEFAULT_SUMMARY_PREFERENCES,
            &ids(&["x", "gpt-3.5-turbo", "claude-3-sonnet"]),
        );
        assert_eq!(chosen, Some(ModelId::new("claude-3-sonnet")));

        let chosen = choose_summary_model(
            &participants,
            &[],
            DEFAULT_SUMMARY_PREFERENCES,
            &ids(&["x", "y"]),
        );
        assert_eq!(chosen, Some(ModelId::new("x")));
    }

    #[test]
    fn test_none_when_nothing_available() {
        let none: [&str; 0] = [];
        assert_eq!(choose_summary_model(&ids(&["a"]), &[], &none, &[]), None);
    }

    #[test]
    fn test_fallback_result_reports_success() {
        let result = SummaryResult::from_fallback("text");
        assert!(result.success);
        assert!(result.fallback);
        assert!(result.model.is_none());
    }
}
