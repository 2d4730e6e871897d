//! Debate configuration from TOML (`[debate]` section)

use palaver_application::DebateParams;
use palaver_domain::debate::{MAX_ROUNDS, MIN_PARTICIPANTS, MIN_ROUNDS};
use palaver_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub max_participants: usize,
    pub default_rounds: u32,
    pub model_pause_ms: u64,
    pub round_pause_ms: u64,
    pub summary_timeout_secs: u64,
    /// Models asked for the summary when no participant argued
    pub summary_preferences: Vec<String>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let defaults = DebateParams::default();
        Self {
            max_participants: defaults.rules.max_participants,
            default_rounds: defaults.default_rounds,
            model_pause_ms: defaults.model_pause.as_millis() as u64,
            round_pause_ms: defaults.round_pause.as_millis() as u64,
            summary_timeout_secs: defaults.summary_timeout.as_secs(),
            summary_preferences: defaults.summary_preferences,
        }
    }
}

impl FileDebateConfig {
    pub fn to_params(&self) -> DebateParams {
        let mut params = DebateParams::default()
            .with_max_participants(self.max_participants.max(MIN_PARTICIPANTS))
            .with_pacing(
                Duration::from_millis(self.model_pause_ms),
                Duration::from_millis(self.round_pause_ms),
            )
            .with_summary_timeout(Duration::from_secs(self.summary_timeout_secs))
            .with_summary_preferences(self.summary_preferences.clone());
        params.default_rounds = self.default_rounds.clamp(MIN_ROUNDS, MAX_ROUNDS);
        params
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.max_participants < MIN_PARTICIPANTS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewDebateParticipants,
                format!(
                    "debate.max_participants must be at least {MIN_PARTICIPANTS}, got {}",
                    self.max_participants
                ),
            ));
        }
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&self.default_rounds) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DefaultRoundsOutOfRange,
                format!(
                    "debate.default_rounds must be between {MIN_ROUNDS} and {MAX_ROUNDS}, got {}; clamped",
                    self.default_rounds
                ),
            ));
        }
        if self.summary_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "debate.summary_timeout_secs cannot be 0",
            ));
        }
    }
}
