//! Debate subdomain: sessions, arguments and the round state machine.
//!
//! A [`DebateSession`] moves through
//! `NotStarted → RoundInProgress(1) → … → RoundInProgress(n) → SynthesizingSummary → Completed`.
//! Transitions are methods on the session; anything else is rejected with
//! [`DomainError::InvalidTransition`](crate::DomainError::InvalidTransition).
//! A session can also be cancelled from any non-terminal phase.

pub mod entities;
pub mod rules;

pub use entities::{Argument, DebatePhase, DebateSession};
pub use rules::{DebateRules, MAX_ROUNDS, MIN_PARTICIPANTS, MIN_ROUNDS};
