//! Domain layer for palaver
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Asking
//!
//! A [`QueryRequest`] fans one prompt out to several models. Each model
//! produces exactly one [`ModelResult`]; failures are classified as an
//! [`InferenceError`] inside the result instead of aborting the batch.
//!
//! ## Debating
//!
//! A [`DebateSession`] runs a fixed number of rounds over a fixed roster.
//! Its transcript feeds [`analyze_consensus`] (keyword heuristics) and the
//! summary stage, which falls back to [`fallback_summary`] when the
//! summary model is unavailable.
//!
//! ## Resources
//!
//! [`resources`] estimates model footprints from their names and plans how
//! many can run at once on the current host.

pub mod config;
pub mod consensus;
pub mod core;
pub mod debate;
pub mod inference;
pub mod policy;
pub mod prompt;
pub mod resources;
pub mod synthesis;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{ConsensusLevel, ConsensusReport, analyze_consensus};
pub use core::{error::DomainError, model::ModelId};
pub use debate::{Argument, DebatePhase, DebateRules, DebateSession};
pub use inference::{ChunkEvent, InferenceError, ModelResult, QueryRequest, QuestionKind, StreamEvent};
pub use policy::ModelSelectionPolicy;
pub use prompt::PromptTemplate;
pub use resources::{ModelCategory, ModelResourceEstimate, SystemProfile};
pub use synthesis::{SummaryResult, choose_summary_model, fallback_summary};
