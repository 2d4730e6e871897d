//! Console output formatter for query, debate and resource results

use colored::Colorize;
use palaver_domain::core::string::word_count;
use palaver_domain::resources::{ModelResourceEstimate, SystemProfile};
use palaver_domain::{
    ConsensusLevel, ConsensusReport, DebateSession, ModelId, ModelResult, ModelSelectionPolicy,
    SummaryResult,
};
use serde::Serialize;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything formatted afterwards.
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    // ==================== Models ====================

    /// One line per model with its size estimate; coding-capable models are marked.
    pub fn format_models(estimates: &[ModelResourceEstimate], policy: &ModelSelectionPolicy) -> String {
        if estimates.is_empty() {
            return format!(
                "{}\n",
                "No models available. Is Ollama running and are models pulled?".yellow()
            );
        }

        let mut output = Self::section_header(&format!("Available models ({})", estimates.len()));
        for est in estimates {
            let marker = if policy.is_coding_capable(&est.model) {
                " [coding]".green().to_string()
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {:<32} {:>8}  ~{:>5.1} GB  {}{}\n",
                est.model.as_str().bold(),
                est.parameters,
                est.size_gb,
                est.category.to_string().dimmed(),
                marker
            ));
        }
        output
    }

    // ==================== Queries ====================

    /// Every answer in request order, failures included
    pub fn format_results(question: &str, results: &[ModelResult]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Model Responses"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));

        for result in results {
            match result.error_message() {
                None => output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ({:.1}s) ──", result.model, result.elapsed_secs)
                        .yellow()
                        .bold(),
                    result.response.trim()
                )),
                Some(error) => output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ({:.1}s) ──", result.model, result.elapsed_secs)
                        .red()
                        .bold(),
                    error
                )),
            }
        }

        output.push_str(&Self::result_tally(results));
        output.push_str(&Self::footer());
        output
    }

    /// One status line per model
    pub fn format_results_summary(results: &[ModelResult]) -> String {
        let mut output = String::new();
        for result in results {
            match result.error_message() {
                None => output.push_str(&format!(
                    "{} {} ({:.1}s, {} words)\n",
                    "v".green(),
                    result.model,
                    result.elapsed_secs,
                    word_count(&result.response)
                )),
                Some(error) => output.push_str(&format!(
                    "{} {}: {}\n",
                    "x".red(),
                    result.model,
                    error
                )),
            }
        }
        output.push_str(&Self::result_tally(results));
        output
    }

    fn result_tally(results: &[ModelResult]) -> String {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        format!(
            "\n{} {}/{} models answered\n",
            "Done:".cyan().bold(),
            succeeded,
            results.len()
        )
    }

    // ==================== Debates ====================

    /// Full transcript: every round, the summary and the consensus analysis
    pub fn format_debate(
        session: &DebateSession,
        summary: Option<&SummaryResult>,
        consensus: &ConsensusReport,
    ) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Model Debate"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), session.topic()));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            join_models(session.participants())
        ));
        output.push_str(&format!("{} {}\n", "Status:".cyan().bold(), session.phase()));

        for round in 1..=session.round_count() {
            let mut arguments = session.arguments_in_round(round).peekable();
            if arguments.peek().is_none() {
                continue;
            }
            output.push_str(&Self::section_header(&format!("Round {round}")));
            for argument in arguments {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", argument.model).yellow().bold(),
                    argument.content.trim()
                ));
            }
        }

        if let Some(summary) = summary {
            output.push_str(&Self::format_summary_block(summary));
        }
        output.push_str(&Self::format_consensus(consensus));
        output.push_str(&Self::footer());
        output
    }

    /// Summary and consensus score only
    pub fn format_debate_summary(
        session: &DebateSession,
        summary: Option<&SummaryResult>,
        consensus: &ConsensusReport,
    ) -> String {
        let mut output = format!(
            "{}\n\n{} {}\n",
            "=== Debate Summary ===".cyan().bold(),
            "Topic:".bold(),
            session.topic()
        );
        match summary {
            Some(summary) => {
                output.push('\n');
                output.push_str(summary.text.trim());
                output.push('\n');
            }
            None => output.push_str(&format!("\n{}\n", "No summary (debate did not finish).".dimmed())),
        }
        output.push_str(&format!(
            "\n{} {:.1} ({})\n",
            "Consensus:".bold(),
            consensus.consensus_score,
            Self::colored_level(consensus.consensus_level)
        ));
        output
    }

    fn format_summary_block(summary: &SummaryResult) -> String {
        let author = match (&summary.model, summary.fallback) {
            (Some(model), false) => format!("Summary by {model}"),
            _ => "Summary (generated locally)".to_string(),
        };
        format!(
            "{}\n{}\n\n{}\n",
            Self::section_header("Summary"),
            author.yellow().bold(),
            summary.text.trim()
        )
    }

    /// Consensus score, interaction counts and per-model participation
    pub fn format_consensus(report: &ConsensusReport) -> String {
        let mut output = Self::section_header("Consensus Analysis");
        output.push_str(&format!(
            "{} {:.1} / 100 ({})\n",
            "Score:".bold(),
            report.consensus_score,
            Self::colored_level(report.consensus_level)
        ));
        output.push_str(&format!(
            "{} {} agreement, {} disagreement, {} building\n",
            "Interactions:".bold(),
            report.interactions.agreement,
            report.interactions.disagreement,
            report.interactions.building
        ));

        if !report.participation.is_empty() {
            output.push_str(&format!("{}\n", "Participation:".bold()));
            for p in &report.participation {
                output.push_str(&format!(
                    "  {:<28} {:>5.1}%  {} words in {} rounds\n",
                    p.model.as_str(),
                    p.participation_percentage,
                    p.total_words,
                    p.rounds_participated
                ));
            }
        }
        output
    }

    fn colored_level(level: ConsensusLevel) -> String {
        let text = level.to_string();
        match level {
            ConsensusLevel::HighConsensus => text.green().bold().to_string(),
            ConsensusLevel::ModerateConsensus => text.green().to_string(),
            ConsensusLevel::LowConsensus => text.yellow().to_string(),
            ConsensusLevel::HighDisagreement => text.red().to_string(),
        }
    }

    // ==================== Resources ====================

    pub fn format_resources(
        profile: &SystemProfile,
        estimates: &[ModelResourceEstimate],
        recommendation: &(usize, Vec<ModelId>),
        sequential: bool,
    ) -> String {
        let mut output = Self::section_header("System");
        output.push_str(&format!(
            "  Memory: {:.1} GB available of {:.1} GB\n",
            profile.available_memory_gb, profile.total_memory_gb
        ));
        output.push_str(&format!("  CPU:    {} logical cores\n", profile.cpu_cores));
        output.push_str(&format!(
            "  OS:     {} ({})\n",
            profile.platform, profile.architecture
        ));
        if profile.gpus.is_empty() {
            output.push_str(&format!("  GPU:    {}\n", "none detected".dimmed()));
        }
        for gpu in &profile.gpus {
            let memory = gpu
                .total_memory_mb
                .map(|mb| format!("{:.1} GB", mb / 1024.0))
                .unwrap_or_else(|| "memory unknown".to_string());
            output.push_str(&format!("  GPU:    {} [{}] {}\n", gpu.name, gpu.vendor, memory));
        }
        if profile.has_gpu() && profile.gpu_memory_gb() > 0.0 {
            output.push_str(&format!("  VRAM:   {:.1} GB total\n", profile.gpu_memory_gb()));
        }
        let large = if profile.can_run_large_models() {
            "yes".green()
        } else {
            "no".yellow()
        };
        output.push_str(&format!("  Large models: {}\n", large));

        if !estimates.is_empty() {
            output.push_str(&Self::section_header("Estimates"));
            for est in estimates {
                output.push_str(&format!(
                    "  {:<32} {:>8}  size {:>5.1} GB  min RAM {:>5.1} GB  recommended {:>5.1} GB\n",
                    est.model.as_str(),
                    est.parameters,
                    est.size_gb,
                    est.min_ram_gb,
                    est.recommended_ram_gb
                ));
            }

            let (concurrency, fits) = recommendation;
            output.push_str(&Self::section_header("Recommendation"));
            output.push_str(&format!("  Concurrency: {}\n", concurrency.to_string().bold()));
            output.push_str(&format!("  Models:      {}\n", join_models(fits)));
            if sequential {
                output.push_str(&format!(
                    "  {}\n",
                    "Selected models exceed available memory together; run them one at a time."
                        .yellow()
                ));
            }
        }
        output
    }

    // ==================== Shared ====================

    /// Pretty JSON for any serializable result
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

fn join_models(models: &[ModelId]) -> String {
    models
        .iter()
        .map(ModelId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_domain::resources::{GpuDescriptor, GpuVendor};
    use palaver_domain::{DebateRules, InferenceError, analyze_consensus};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_results_include_failures() {
        plain();
        let results = vec![
            ModelResult::success(ModelId::new("llama3"), "Forty-two.", 1.5),
            ModelResult::failure(ModelId::new("ghost"), InferenceError::ModelNotFound, 0.1),
        ];
        let out = ConsoleFormatter::format_results("Meaning of life?", &results);
        assert!(out.contains("── llama3 (1.5s) ──"));
        assert!(out.contains("Forty-two."));
        assert!(out.contains("Error: model not found"));
        assert!(out.contains("1/2 models answered"));
    }

    #[test]
    fn test_summary_lines() {
        plain();
        let results = vec![ModelResult::success(ModelId::new("phi3"), "one two three", 2.0)];
        let out = ConsoleFormatter::format_results_summary(&results);
        assert!(out.contains("v phi3 (2.0s, 3 words)"));
    }

    #[test]
    fn test_debate_transcript() {
        plain();
        let rules = DebateRules::default();
        let mut session = DebateSession::start(
            "Tabs or spaces?",
            vec![ModelId::new("a"), ModelId::new("b")],
            2,
            &rules,
        )
        .unwrap();
        session.begin_round(1).unwrap();
        session.record(ModelId::new("a"), "Tabs, clearly.").unwrap();
        session.record(ModelId::new("b"), "I oppose tabs.").unwrap();

        let consensus = analyze_consensus(session.topic(), session.arguments());
        let out = ConsoleFormatter::format_debate(&session, None, &consensus);
        assert!(out.contains("Topic: Tabs or spaces?"));
        assert!(out.contains("Round 1"));
        assert!(!out.contains("Round 2"));
        assert!(out.contains("Tabs, clearly."));
        assert!(out.contains("Consensus Analysis"));
    }

    #[test]
    fn test_resources_show_gpu_memory_and_large_model_fit() {
        plain();
        let profile = SystemProfile {
            total_memory_gb: 64.0,
            available_memory_gb: 40.0,
            cpu_cores: 16,
            gpus: vec![GpuDescriptor {
                name: "RTX 4090".into(),
                vendor: GpuVendor::Nvidia,
                total_memory_mb: Some(24576.0),
                free_memory_mb: None,
            }],
            platform: "linux".into(),
            architecture: "x86_64".into(),
        };
        let out = ConsoleFormatter::format_resources(&profile, &[], &(1, Vec::new()), false);
        assert!(out.contains("VRAM:   24.0 GB total"));
        assert!(out.contains("Large models: yes"));

        let small = SystemProfile {
            available_memory_gb: 8.0,
            ..Default::default()
        };
        let out = ConsoleFormatter::format_resources(&small, &[], &(1, Vec::new()), false);
        assert!(!out.contains("VRAM"));
        assert!(out.contains("Large models: no"));
    }

    #[test]
    fn test_empty_model_list_hint() {
        plain();
        let out = ConsoleFormatter::format_models(&[], &ModelSelectionPolicy::default());
        assert!(out.contains("No models available"));
    }
}
