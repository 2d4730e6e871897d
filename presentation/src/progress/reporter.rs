//! Progress reporting for queries and debates

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use palaver_application::{EventSink, ForumEvent};
use std::sync::Mutex;

/// Reports progress with progress bars. Meant for non-streamed queries,
/// where nothing else writes to the terminal while models run.
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid progress template")
            .progress_chars("=>-")
    }

    fn start(&self, prefix: String, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(prefix);
        pb.set_message("Starting...");
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(pb);
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            f(pb);
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ProgressReporter {
    fn emit(&self, event: ForumEvent) {
        match event {
            ForumEvent::QueryStarted { models, .. } => {
                self.start("Querying".to_string(), models.len());
            }
            ForumEvent::BatchStarted { index, models } => self.with_bar(|pb| {
                pb.set_message(format!("batch {}: {} models", index + 1, models.len()));
            }),
            ForumEvent::ModelFinished(result) => self.with_bar(|pb| {
                let status = if result.is_success() {
                    format!("{} {}", "v".green(), result.model)
                } else {
                    format!("{} {}", "x".red(), result.model)
                };
                pb.set_message(status);
                pb.inc(1);
            }),
            ForumEvent::QueryCompleted { succeeded, failed } => {
                self.finish(format!("{} ({} ok, {} failed)", "done".green(), succeeded, failed));
            }
            ForumEvent::DebateStarted {
                participants,
                rounds,
                ..
            } => {
                self.start("Debate".to_string(), participants.len() * rounds as usize);
            }
            ForumEvent::RoundStarted { round, total_rounds } => self.with_bar(|pb| {
                pb.set_prefix(format!("Round {round}/{total_rounds}"));
            }),
            ForumEvent::Chunk(chunk) if chunk.done => self.with_bar(|pb| {
                pb.set_message(chunk.model.to_string());
                pb.inc(1);
            }),
            ForumEvent::SummaryStarted { .. } => self.with_bar(|pb| {
                pb.set_prefix("Summary");
                pb.set_message("Synthesizing...");
            }),
            ForumEvent::DebateCompleted { .. } => self.finish("debate complete".green().to_string()),
            ForumEvent::DebateCancelled {
                completed_rounds, ..
            } => self.finish(format!(
                "{} after {} rounds",
                "cancelled".yellow(),
                completed_rounds
            )),
            ForumEvent::Chunk(_) | ForumEvent::RoundCompleted { .. } => {}
        }
    }
}

/// Simple text-based progress (no fancy UI). Safe to combine with streamed text.
pub struct SimpleProgress;

impl EventSink for SimpleProgress {
    fn emit(&self, event: ForumEvent) {
        match event {
            ForumEvent::QueryStarted {
                models,
                concurrency,
                ..
            } => println!(
                "{} {} ({} models, {} at a time)",
                "->".cyan(),
                "Querying".bold(),
                models.len(),
                concurrency
            ),
            ForumEvent::ModelFinished(result) => match result.error_message() {
                None => println!("  {} {} ({:.1}s)", "v".green(), result.model, result.elapsed_secs),
                Some(error) => println!("  {} {} ({})", "x".red(), result.model, error),
            },
            ForumEvent::DebateStarted {
                topic,
                participants,
                rounds,
                ..
            } => println!(
                "{} {} \"{}\" ({} models, {} rounds)",
                "->".cyan(),
                "Debate".bold(),
                topic,
                participants.len(),
                rounds
            ),
            ForumEvent::RoundStarted { round, total_rounds } => {
                println!("\n{} {}", "->".cyan(), format!("Round {round}/{total_rounds}").bold());
            }
            ForumEvent::RoundCompleted { round, arguments } => {
                println!("  {} round {} ({} arguments)", "v".green(), round, arguments.len());
            }
            ForumEvent::SummaryStarted { .. } => {
                println!("\n{} {}", "->".cyan(), "Synthesizing summary".bold());
            }
            ForumEvent::DebateCancelled {
                completed_rounds, ..
            } => println!(
                "{} debate cancelled after {} rounds",
                "!".yellow(),
                completed_rounds
            ),
            _ => {}
        }
    }
}
