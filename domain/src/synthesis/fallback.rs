//! Deterministic local summary used when the summary model is unavailable.

use crate::core::model::ModelId;
use crate::core::string::word_count;
use crate::debate::Argument;
use std::fmt::Write;

const CONCLUSION: &str = "The debate covered multiple perspectives on the topic. \
Each model contributed its own viewpoint and analysis, leading to a broad discussion \
of the key issues and possible resolutions.";

const VOTING: &str = "Based on the recorded interactions, every participant contributed \
to the discussion. No model-written verdict is available, so no winner is declared.";

/// Build a markdown summary from argument statistics alone.
///
/// Always returns non-empty text, even for an empty argument list.
pub fn fallback_summary(topic: &str, arguments: &[Argument], participants: &[ModelId]) -> String {
    struct Contribution<'a> {
        model: &'a ModelId,
        count: usize,
        chars: usize,
        words: usize,
    }

    let mut contributions: Vec<Contribution<'_>> = Vec::new();
    for argument in arguments {
        let entry = match contributions.iter().position(|c| c.model == &argument.model) {
            Some(idx) => &mut contributions[idx],
            None => {
                contributions.push(Contribution {
                    model: &argument.model,
                    count: 0,
                    chars: 0,
                    words: 0,
                });
                let last = contributions.len() - 1;
                &mut contributions[last]
            }
        };
        entry.count += 1;
        entry.chars += argument.content.chars().count();
        entry.words += word_count(&argument.content);
    }

    let total = arguments.len();
    let total_words: usize = contributions.iter().map(|c| c.words).sum();
    let roster = if participants.is_empty() {
        "none".to_string()
    } else {
        participants
            .iter()
            .map(ModelId::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    // expected contributions per participant
    let fair_share = total as f64 / participants.len().max(1) as f64;

    let mut text = String::new();
    let _ = writeln!(text, "# Debate Summary: {topic}\n");
    let _ = writeln!(text, "## Debate Overview");
    let _ = writeln!(text, "- **Total Interactions:** {total}");
    let _ = writeln!(text, "- **Participating Models:** {roster}");
    let _ = writeln!(text, "- **Total Words:** {total_words}\n");
    let _ = writeln!(text, "## Model Participation");

    if contributions.is_empty() {
        let _ = writeln!(text, "\nNo arguments were recorded.");
    }
    for c in &contributions {
        let avg_chars = c.chars as f64 / c.count as f64;
        let engagement = if c.count as f64 > fair_share {
            "High"
        } else {
            "Moderate"
        };
        let _ = writeln!(text, "\n### {}", c.model);
        let _ = writeln!(text, "- **Contributions:** {} responses", c.count);
        let _ = writeln!(text, "- **Average Response Length:** {avg_chars:.0} characters");
        let _ = writeln!(text, "- **Engagement Level:** {engagement}");
    }

    let _ = writeln!(text, "\n## Debate Conclusion\n{CONCLUSION}");
    let _ = writeln!(text, "\n## Voting Analysis\n{VOTING}");
    let _ = write!(
        text,
        "\n**Note:** This summary was generated from statistics of the debate interactions."
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ModelId> {
        names.iter().map(|n| ModelId::new(*n)).collect()
    }

    #[test]
    fn test_contains_statistics() {
        let args = vec![
            Argument::new(1, ModelId::new("a"), "abcd efgh"),
            Argument::new(1, ModelId::new("b"), "xy"),
            Argument::new(2, ModelId::new("a"), "abcdefgh zz"),
        ];
        let text = fallback_summary("Tabs or spaces", &args, &ids(&["a", "b", "c"]));

        assert!(text.starts_with("# Debate Summary: Tabs or spaces"));
        assert!(text.contains("**Total Interactions:** 3"));
        assert!(text.contains("**Participating Models:** a, b, c"));
        assert!(text.contains("**Total Words:** 5"));
        assert!(text.contains("### a\n- **Contributions:** 2 responses"));
        assert!(text.contains("**Average Response Length:** 10 characters"));
        // a: 2 > 3/3 -> High, b: 1 -> Moderate
        assert!(text.contains("**Engagement Level:** High"));
        assert!(text.contains("**Engagement Level:** Moderate"));
        assert!(text.contains("## Debate Conclusion"));
    }

    #[test]
    fn test_empty_debate_still_produces_text() {
        let text = fallback_summary("X", &[], &[]);
        assert!(!text.is_empty());
        assert!(text.contains("No arguments were recorded."));
        assert!(text.contains("**Participating Models:** none"));
    }
}
