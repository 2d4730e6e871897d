//! Debate entities.

use super::rules::DebateRules;
use crate::core::error::DomainError;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence that keeps debate ids unique within one second.
static DEBATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Lifecycle phase of a debate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "snake_case")]
pub enum DebatePhase {
    NotStarted,
    RoundInProgress(u32),
    SynthesizingSummary,
    Completed,
    /// Stopped by the caller before completion.
    Cancelled,
}

impl DebatePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DebatePhase::Completed | DebatePhase::Cancelled)
    }

    pub fn current_round(&self) -> Option<u32> {
        match self {
            DebatePhase::RoundInProgress(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebatePhase::NotStarted => write!(f, "not started"),
            DebatePhase::RoundInProgress(r) => write!(f, "round {r} in progress"),
            DebatePhase::SynthesizingSummary => write!(f, "synthesizing summary"),
            DebatePhase::Completed => write!(f, "completed"),
            DebatePhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One model's contribution to one round. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub round: u32,
    pub model: ModelId,
    pub content: String,
    /// Unix timestamp in milliseconds
    pub created_at: u64,
}

impl Argument {
    pub fn new(round: u32, model: ModelId, content: impl Into<String>) -> Self {
        Self {
            round,
            model,
            content: content.into(),
            created_at: current_timestamp(),
        }
    }
}

/// A debate between a fixed set of models over a fixed number of rounds.
///
/// Arguments are appended in round order only; the session is sealed
/// (`ended_at` set) when synthesis begins or the debate is cancelled.
///
/// # Example
///
/// ```
/// use palaver_domain::{DebatePhase, DebateRules, DebateSession, ModelId};
///
/// let models = vec![ModelId::new("a"), ModelId::new("b")];
/// let mut session = DebateSession::start("tabs vs spaces", models, 2, &DebateRules::default()).unwrap();
/// session.begin_round(1).unwrap();
/// session.record(ModelId::new("a"), "Tabs.").unwrap();
/// session.begin_round(2).unwrap();
/// session.begin_synthesis().unwrap();
/// session.complete().unwrap();
/// assert_eq!(session.phase(), DebatePhase::Completed);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    id: String,
    topic: String,
    participants: Vec<ModelId>,
    round_count: u32,
    started_at: u64,
    ended_at: Option<u64>,
    phase: DebatePhase,
    arguments: Vec<Argument>,
}

impl DebateSession {
    /// Validate the request and create a session in [`DebatePhase::NotStarted`].
    pub fn start(
        topic: impl Into<String>,
        participants: Vec<ModelId>,
        round_count: u32,
        rules: &DebateRules,
    ) -> Result<Self, DomainError> {
        let topic = topic.into().trim().to_string();
        rules.validate(&topic, &participants, round_count)?;
        let started_at = current_timestamp();
        Ok(Self {
            id: format!(
                "debate_{}_{}",
                started_at / 1000,
                DEBATE_SEQUENCE.fetch_add(1, Ordering::Relaxed)
            ),
            topic,
            participants,
            round_count,
            started_at,
            ended_at: None,
            phase: DebatePhase::NotStarted,
            arguments: Vec::new(),
        })
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn participants(&self) -> &[ModelId] {
        &self.participants
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn arguments_in_round(&self, round: u32) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(move |a| a.round == round)
    }

    /// Arguments from rounds before `round` made by anyone except `model`.
    pub fn prior_arguments_excluding<'a>(
        &'a self,
        model: &'a ModelId,
        round: u32,
    ) -> impl Iterator<Item = &'a Argument> {
        self.arguments
            .iter()
            .filter(move |a| a.round < round && &a.model != model)
    }

    pub fn is_final_round(&self, round: u32) -> bool {
        round == self.round_count
    }

    // ==================== Transitions ====================

    /// Enter round `round`. Rounds must be entered in order starting at 1.
    pub fn begin_round(&mut self, round: u32) -> Result<(), DomainError> {
        let expected = match self.phase {
            DebatePhase::NotStarted => 1,
            DebatePhase::RoundInProgress(r) => r + 1,
            other => return Err(self.invalid(format!("cannot begin round {round} while {other}"))),
        };
        if round != expected || round > self.round_count {
            return Err(self.invalid(format!(
                "cannot begin round {round} while {}",
                self.phase
            )));
        }
        self.phase = DebatePhase::RoundInProgress(round);
        Ok(())
    }

    /// Append an argument for the round in progress.
    pub fn record(
        &mut self,
        model: ModelId,
        content: impl Into<String>,
    ) -> Result<&Argument, DomainError> {
        let DebatePhase::RoundInProgress(round) = self.phase else {
            return Err(self.invalid(format!("cannot record an argument while {}", self.phase)));
        };
        if !self.participants.contains(&model) {
            return Err(self.invalid(format!("{model} is not a participant")));
        }
        self.arguments.push(Argument::new(round, model, content));
        Ok(&self.arguments[self.arguments.len() - 1])
    }

    /// Seal the session and start synthesis. Only valid after the final round.
    pub fn begin_synthesis(&mut self) -> Result<(), DomainError> {
        if self.phase != DebatePhase::RoundInProgress(self.round_count) {
            return Err(self.invalid(format!("cannot synthesize while {}", self.phase)));
        }
        self.phase = DebatePhase::SynthesizingSummary;
        self.ended_at = Some(current_timestamp());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.phase != DebatePhase::SynthesizingSummary {
            return Err(self.invalid(format!("cannot complete while {}", self.phase)));
        }
        self.phase = DebatePhase::Completed;
        Ok(())
    }

    /// Stop the debate. Arguments recorded so far are kept.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.phase.is_terminal() {
            return Err(self.invalid(format!("cannot cancel while {}", self.phase)));
        }
        self.phase = DebatePhase::Cancelled;
        self.ended_at.get_or_insert_with(current_timestamp);
        Ok(())
    }

    fn invalid(&self, message: String) -> DomainError {
        DomainError::InvalidTransition(format!("{}: {message}", self.id))
    }
}

/// Get current timestamp in milliseconds since Unix epoch
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
