//! Debate consensus analysis.
//!
//! A heuristic, keyword-based reading of how much the participants agreed.
//! [`analyze_consensus`] is pure and deterministic.

mod analyzer;
mod report;

pub use analyzer::{
    AGREEMENT_KEYWORDS, BUILDING_KEYWORDS, DISAGREEMENT_KEYWORDS, analyze_consensus,
};
pub use report::{
    ConsensusLevel, ConsensusReport, DebateMetrics, InteractionCounts, ModelParticipation,
    RoundBreakdown, RoundContribution,
};
