//! Consensus report value objects.

use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-bucket label for a consensus score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusLevel {
    HighConsensus,
    ModerateConsensus,
    LowConsensus,
    HighDisagreement,
}

impl ConsensusLevel {
    /// Bucket a 0-100 score: >=75 high, >=50 moderate, >=25 low, else disagreement.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::HighConsensus
        } else if score >= 50.0 {
            Self::ModerateConsensus
        } else if score >= 25.0 {
            Self::LowConsensus
        } else {
            Self::HighDisagreement
        }
    }
}

impl fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsensusLevel::HighConsensus => write!(f, "High Consensus"),
            ConsensusLevel::ModerateConsensus => write!(f, "Moderate Consensus"),
            ConsensusLevel::LowConsensus => write!(f, "Low Consensus"),
            ConsensusLevel::HighDisagreement => write!(f, "High Disagreement"),
        }
    }
}

/// Word-share statistics for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParticipation {
    pub model: ModelId,
    pub total_words: usize,
    pub rounds_participated: usize,
    pub avg_words_per_round: f64,
    /// Share of all words, rounded to one decimal
    pub participation_percentage: f64,
}

/// Keyword hit counts. Each category counts at most once per argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCounts {
    pub agreement: usize,
    pub disagreement: usize,
    pub building: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContribution {
    pub model: ModelId,
    pub words: usize,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundBreakdown {
    pub round: u32,
    pub participants: usize,
    pub total_words: usize,
    pub avg_words_per_participant: f64,
    pub contributions: Vec<RoundContribution>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DebateMetrics {
    pub total_words: usize,
    pub total_rounds: u32,
    pub participants: usize,
    pub avg_participation: f64,
}

/// Read-only analysis of a debate's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub topic: String,
    pub consensus_score: f64,
    pub consensus_level: ConsensusLevel,
    /// Ordered by each model's first argument
    pub participation: Vec<ModelParticipation>,
    pub interactions: InteractionCounts,
    pub rounds: Vec<RoundBreakdown>,
    pub metrics: DebateMetrics,
}

impl ConsensusReport {
    /// Report for a debate with no arguments.
    pub fn empty(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            consensus_score: 0.0,
            consensus_level: ConsensusLevel::HighDisagreement,
            participation: Vec::new(),
            interactions: InteractionCounts::default(),
            rounds: Vec::new(),
            metrics: DebateMetrics::default(),
        }
    }

    pub fn participation_for(&self, model: &ModelId) -> Option<&ModelParticipation> {
        self.participation.iter().find(|p| &p.model == model)
    }

    pub fn is_empty(&self) -> bool {
        self.participation.is_empty()
    }
}
