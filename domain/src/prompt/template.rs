//! Prompt templates for asking and debating

use crate::core::model::ModelId;
use crate::core::string::excerpt;
use crate::debate::Argument;
use crate::inference::QuestionKind;

/// Characters of each earlier argument shown from round 3 on.
pub const HISTORY_EXCERPT_CHARS: usize = 200;

/// Most recent arguments included in the summary prompt.
pub const SUMMARY_ARGUMENT_COUNT: usize = 6;

/// Characters of each argument shown in the summary prompt.
pub const SUMMARY_EXCERPT_CHARS: usize = 100;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Wrap a user question according to its kind
    pub fn enhance(question: &str, kind: QuestionKind) -> String {
        match kind {
            QuestionKind::General => Self::general_question(question),
            QuestionKind::Coding => Self::coding_question(question),
        }
    }

    pub fn general_question(question: &str) -> String {
        format!(
            r#"Please give a thorough and helpful answer to the following question:

{}

Be clear and accurate, and include examples where they help."#,
            question
        )
    }

    pub fn coding_question(question: &str) -> String {
        format!(
            r#"You are an experienced programmer. Provide a clear, well-documented solution to this coding question:

{}

Include:
- An explanation of the approach
- Commented code
- Important considerations and edge cases
- Time/space complexity where it applies

Separate the explanation from the code."#,
            question
        )
    }

    /// Prompt for `model` in `round` of `round_count`.
    ///
    /// `prior` holds the arguments of the other participants from earlier
    /// rounds; the model's own arguments must not be included.
    pub fn debate_round(
        topic: &str,
        model: &ModelId,
        round: u32,
        round_count: u32,
        prior: &[&Argument],
    ) -> String {
        match round {
            0 | 1 => Self::opening_round(topic, model, round_count),
            2 => Self::rebuttal_round(topic, model, prior),
            _ => Self::closing_round(topic, model, round, round_count, prior),
        }
    }

    fn opening_round(topic: &str, model: &ModelId, round_count: u32) -> String {
        format!(
            r#"You are "{model}" taking part in a structured debate with other AI models.

TOPIC: {topic}

This is ROUND 1 of {round_count}. State your initial position on the topic.

Requirements:
- Commit to a clear position (for, against, or a specific nuanced stance)
- Support it with evidence or logical reasoning
- Keep it to 2-3 paragraphs
- Keep a respectful, academic tone
- You will defend this position in later rounds

Your opening argument:"#
        )
    }

    fn rebuttal_round(topic: &str, model: &ModelId, prior: &[&Argument]) -> String {
        let others: Vec<String> = prior
            .iter()
            .filter(|a| a.round == 1 && &a.model != model)
            .map(|a| format!("**{}**:\n{}", a.model, a.content))
            .collect();
        let others = if others.is_empty() {
            "No other arguments were made.".to_string()
        } else {
            others.join("\n\n")
        };

        format!(
            r#"You are "{model}" in round 2 of a debate on: {topic}

ARGUMENTS FROM THE OTHER PARTICIPANTS IN ROUND 1:
{others}

Respond to these arguments:
- Address specific points, naming the model that made them
- Strengthen your position with new evidence
- Acknowledge valid points while keeping your stance
- Challenge weak reasoning respectfully
- Build on any common ground

Your response (2-3 paragraphs):"#
        )
    }

    fn closing_round(
        topic: &str,
        model: &ModelId,
        round: u32,
        round_count: u32,
        prior: &[&Argument],
    ) -> String {
        let mut history = String::new();
        for r in 1..round {
            history.push_str(&format!("ROUND {r}:\n"));
            for a in prior.iter().filter(|a| a.round == r && &a.model != model) {
                history.push_str(&format!(
                    "**{}**: {}\n\n",
                    a.model,
                    excerpt(&a.content, HISTORY_EXCERPT_CHARS)
                ));
            }
        }

        let heading = if round == round_count {
            format!("the FINAL ROUND ({round})")
        } else {
            format!("round {round} of {round_count}")
        };

        format!(
            r#"You are "{model}" in {heading} of the debate on: {topic}

DEBATE SO FAR:
{history}
Make your closing case:
- Summarize your strongest arguments
- Answer the remaining counterpoints
- Note any common ground
- State your final position clearly
- Be persuasive but fair

Your closing argument (2-3 paragraphs):"#
        )
    }

    /// Short synthesis prompt over the most recent arguments.
    pub fn debate_summary(topic: &str, arguments: &[Argument]) -> String {
        let start = arguments.len().saturating_sub(SUMMARY_ARGUMENT_COUNT);
        let points: Vec<String> = arguments[start..]
            .iter()
            .filter(|a| !a.content.trim().is_empty())
            .map(|a| format!("- {}: {}", a.model, excerpt(&a.content, SUMMARY_EXCERPT_CHARS)))
            .collect();

        format!(
            r#"Briefly summarize this debate about: {}

Key points from the debate:
{}

Give a concise 2-3 sentence summary of the main arguments and name a clear winner if there is one."#,
            topic,
            points.join("\n")
        )
    }
}
