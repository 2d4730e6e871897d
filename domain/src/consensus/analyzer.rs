//! Keyword-based consensus scoring.

use super::report::{
    ConsensusLevel, ConsensusReport, DebateMetrics, InteractionCounts, ModelParticipation,
    RoundBreakdown, RoundContribution,
};
use crate::core::model::ModelId;
use crate::core::string::{excerpt, round1, word_count};
use crate::debate::{Argument, DebateSession};

pub const AGREEMENT_KEYWORDS: &[&str] = &[
    "agree",
    "correct",
    "valid point",
    "as mentioned",
    "similarly",
    "indeed",
    "likewise",
];

pub const DISAGREEMENT_KEYWORDS: &[&str] = &[
    "however",
    "disagree",
    "contrary",
    "wrong",
    "incorrect",
    "unlike",
    "oppose",
];

pub const BUILDING_KEYWORDS: &[&str] = &[
    "building on",
    "expanding",
    "furthermore",
    "additionally",
    "also",
];

const PREVIEW_CHARS: usize = 100;

/// Analyze a list of debate arguments.
///
/// Rounds are reported from 1 up to the highest round present. An empty
/// list yields [`ConsensusReport::empty`].
///
/// Score = clamp(((agreement + building) x 50 - disagreement x 25) x 2, 0, 100),
/// using per-argument ratios.
///
/// # Example
///
/// ```
/// use palaver_domain::{Argument, ModelId, analyze_consensus};
///
/// let args = vec![
///     Argument::new(1, ModelId::new("a"), "I agree and would also add more."),
///     Argument::new(1, ModelId::new("b"), "Indeed, furthermore it scales."),
/// ];
/// let report = analyze_consensus("X", &args);
/// assert_eq!(report.consensus_score, 100.0);
/// ```
pub fn analyze_consensus(topic: &str, arguments: &[Argument]) -> ConsensusReport {
    let rounds = arguments.iter().map(|a| a.round).max().unwrap_or(0);
    analyze(topic, arguments, rounds)
}

impl ConsensusReport {
    /// Analyze a session, reporting every configured round even if empty.
    pub fn for_session(session: &DebateSession) -> Self {
        let seen = session.arguments().iter().map(|a| a.round).max().unwrap_or(0);
        analyze(
            session.topic(),
            session.arguments(),
            session.round_count().max(seen),
        )
    }
}

fn analyze(topic: &str, arguments: &[Argument], rounds: u32) -> ConsensusReport {
    if arguments.is_empty() {
        return ConsensusReport::empty(topic);
    }

    let interactions = count_interactions(arguments);
    let consensus_score = score(&interactions);
    let participation = participation(arguments);
    let total_words: usize = participation.iter().map(|p| p.total_words).sum();

    let round_breakdown = (1..=rounds)
        .map(|round| {
            let contributions: Vec<RoundContribution> = arguments
                .iter()
                .filter(|a| a.round == round)
                .map(|a| RoundContribution {
                    model: a.model.clone(),
                    words: word_count(&a.content),
                    preview: excerpt(&a.content, PREVIEW_CHARS),
                })
                .collect();
            let round_words: usize = contributions.iter().map(|c| c.words).sum();
            RoundBreakdown {
                round,
                participants: contributions.len(),
                total_words: round_words,
                avg_words_per_participant: if contributions.is_empty() {
                    0.0
                } else {
                    round1(round_words as f64 / contributions.len() as f64)
                },
                contributions,
            }
        })
        .collect();

    let metrics = DebateMetrics {
        total_words,
        total_rounds: rounds,
        participants: participation.len(),
        avg_participation: round1(100.0 / participation.len() as f64),
    };

    ConsensusReport {
        topic: topic.to_string(),
        consensus_score,
        consensus_level: ConsensusLevel::from_score(consensus_score),
        participation,
        interactions,
        rounds: round_breakdown,
        metrics,
    }
}

fn count_interactions(arguments: &[Argument]) -> InteractionCounts {
    let mut counts = InteractionCounts::default();
    for argument in arguments {
        let text = argument.content.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));
        counts.total += 1;
        counts.agreement += usize::from(hit(AGREEMENT_KEYWORDS));
        counts.disagreement += usize::from(hit(DISAGREEMENT_KEYWORDS));
        counts.building += usize::from(hit(BUILDING_KEYWORDS));
    }
    counts
}

fn score(counts: &InteractionCounts) -> f64 {
    if counts.total == 0 {
        return 0.0;
    }
    let total = counts.total as f64;
    let agreement = counts.agreement as f64 / total;
    let building = counts.building as f64 / total;
    let disagreement = counts.disagreement as f64 / total;
    round1(((agreement + building) * 50.0 - disagreement * 25.0) * 2.0).clamp(0.0, 100.0)
}

fn participation(arguments: &[Argument]) -> Vec<ModelParticipation> {
    let mut order: Vec<ModelId> = Vec::new();
    let mut words: Vec<usize> = Vec::new();
    let mut turns: Vec<usize> = Vec::new();

    for argument in arguments {
        let idx = match order.iter().position(|m| m == &argument.model) {
            Some(idx) => idx,
            None => {
                order.push(argument.model.clone());
                words.push(0);
                turns.push(0);
                order.len() - 1
            }
        };
        words[idx] += word_count(&argument.content);
        turns[idx] += 1;
    }

    let total_words: usize = words.iter().sum();
    let models = order.len() as f64;

    order
        .into_iter()
        .zip(words)
        .zip(turns)
        .map(|((model, total), rounds)| {
            let share = if total_words == 0 {
                100.0 / models
            } else {
                total as f64 / total_words as f64 * 100.0
            };
            ModelParticipation {
                model,
                total_words: total,
                rounds_participated: rounds,
                avg_words_per_round: round1(total as f64 / rounds as f64),
                participation_percentage: round1(share),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(round: u32, model: &str, content: &str) -> Argument {
        Argument::new(round, ModelId::new(model), content)
    }

    #[test]
    fn test_empty_arguments() {
        let report = analyze_consensus("X", &[]);
        assert_eq!(report.consensus_score, 0.0);
        assert_eq!(report.consensus_level, ConsensusLevel::HighDisagreement);
        assert!(report.participation.is_empty());
        assert!(report.rounds.is_empty());
    }

    #[test]
    fn test_keyword_counts_once_per_category() {
        let args = vec![
            arg(1, "a", "I agree, indeed I agree. However, also this."),
            arg(1, "b", "That is wrong and I oppose it."),
            arg(2, "a", "Plain statement."),
        ];
        let report = analyze_consensus("X", &args);
        assert_eq!(
            report.interactions,
            InteractionCounts {
                agreement: 1,
                disagreement: 2,
                building: 1,
                total: 3,
            }
        );
        // ((1/3 + 1/3) * 50 - 2/3 * 25) * 2 = 33.33
        assert_eq!(report.consensus_score, 33.3);
        assert_eq!(report.consensus_level, ConsensusLevel::LowConsensus);
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let args = vec![arg(1, "a", "You are wrong."), arg(1, "b", "I oppose this.")];
        let report = analyze_consensus("X", &args);
        assert_eq!(report.consensus_score, 0.0);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let args = vec![arg(1, "a", "AGREE! Furthermore...")];
        let report = analyze_consensus("X", &args);
        assert_eq!(report.consensus_score, 100.0);
        assert_eq!(report.consensus_level, ConsensusLevel::HighConsensus);
    }

    #[test]
    fn test_participation_percentages_sum_to_hundred() {
        let args = vec![
            arg(1, "a", "one two three"),
            arg(1, "b", "one two three four five six seven"),
            arg(1, "c", "one"),
            arg(2, "a", "one two three four five"),
        ];
        let report = analyze_consensus("X", &args);
        let sum: f64 = report
            .participation
            .iter()
            .map(|p| p.participation_percentage)
            .sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {sum}");

        let a = report.participation_for(&ModelId::new("a")).unwrap();
        assert_eq!(a.total_words, 8);
        assert_eq!(a.rounds_participated, 2);
        assert_eq!(a.avg_words_per_round, 4.0);
        assert_eq!(a.participation_percentage, 50.0);

        let order: Vec<&str> = report.participation.iter().map(|p| p.model.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_zero_words_split_evenly() {
        let args = vec![arg(1, "a", ""), arg(1, "b", "  "), arg(1, "c", "")];
        let report = analyze_consensus("X", &args);
        let sum: f64 = report
            .participation
            .iter()
            .map(|p| p.participation_percentage)
            .sum();
        assert!((sum - 100.0).abs() <= 0.5);
        assert_eq!(report.participation[0].participation_percentage, 33.3);
    }

    #[test]
    fn test_round_breakdown() {
        let long = "word ".repeat(40);
        let args = vec![
            arg(1, "a", &long),
            arg(1, "b", "two words"),
            arg(3, "a", "late"),
        ];
        let report = analyze_consensus("X", &args);
        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.rounds[0].participants, 2);
        assert_eq!(report.rounds[0].total_words, 42);
        assert_eq!(report.rounds[0].avg_words_per_participant, 21.0);
        assert!(report.rounds[0].contributions[0].preview.ends_with("..."));
        assert_eq!(report.rounds[1].participants, 0);
        assert_eq!(report.rounds[1].avg_words_per_participant, 0.0);
        assert_eq!(report.metrics.total_words, 43);
        assert_eq!(report.metrics.total_rounds, 3);
        assert_eq!(report.metrics.participants, 2);
        assert_eq!(report.metrics.avg_participation, 50.0);
    }

    #[test]
    fn test_session_reports_configured_rounds() {
        use crate::debate::DebateRules;

        let mut session = DebateSession::start(
            "X",
            vec![ModelId::new("a"), ModelId::new("b")],
            3,
            &DebateRules::default(),
        )
        .unwrap();
        session.begin_round(1).unwrap();
        session.record(ModelId::new("a"), "hello there").unwrap();

        let report = ConsensusReport::for_session(&session);
        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.metrics.total_rounds, 3);
    }
}
