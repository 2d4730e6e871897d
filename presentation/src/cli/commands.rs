//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every answer with timings and failures
    Full,
    /// One line per model; only the summary for debates
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for palaver_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for palaver
#[derive(Parser, Debug)]
#[command(name = "palaver")]
#[command(author, version, about = "Ask several local models at once, or let them debate")]
#[command(long_about = r#"
palaver sends prompts to the models served by a local Ollama instance.

Commands:
  models      List available models with size estimates
  ask         Send one question to several models concurrently
  debate      Run a multi-round debate between 2-4 models
  resources   Show host resources and a concurrency recommendation

Configuration files are loaded from (in priority order):
1. PALAVER_<SECTION>__<KEY>   Environment variables
2. --config <path>            Explicit config file
3. ./palaver.toml             Project-level config
4. ~/.config/palaver/config.toml   Global config

Example:
  palaver ask "What is a monad?" -m llama3 -m mistral
  palaver ask --coding "Reverse a linked list in Rust" --auto-concurrency
  palaver debate "Tabs or spaces?" -m llama3 -m mistral -m phi3 -r 3
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available models
    Models(ModelsArgs),
    /// Ask several models the same question
    Ask(AskArgs),
    /// Let models debate a topic over several rounds
    Debate(DebateArgs),
    /// Show host resources and per-model estimates
    Resources(ResourcesArgs),
}

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Bypass the model list cache
    #[arg(long)]
    pub refresh: bool,

    /// Include models hidden by the size filter
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Models to ask (can be specified multiple times; default: all suitable)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Treat the question as a programming question
    #[arg(long)]
    pub coding: bool,

    /// How many models run at once
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Pick concurrency and models from available host resources
    #[arg(long, conflicts_with = "concurrency")]
    pub auto_concurrency: bool,

    /// Wait for whole answers instead of streaming them
    #[arg(long)]
    pub no_stream: bool,
}

#[derive(Args, Debug)]
pub struct DebateArgs {
    /// The topic to debate
    pub topic: String,

    /// Participating models, in speaking order (2 or more)
    #[arg(short, long, value_name = "MODEL", required = true)]
    pub model: Vec<String>,

    /// Number of rounds (2-5; default from configuration)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Models to estimate (default: all available)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "palaver", "ask", "why?", "-m", "llama3", "-m", "phi3", "-c", "2", "--no-stream",
        ]);
        let Some(Command::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.question, "why?");
        assert_eq!(args.model, vec!["llama3", "phi3"]);
        assert_eq!(args.concurrency, Some(2));
        assert!(args.no_stream);
    }

    #[test]
    fn test_parse_debate_with_global_flags() {
        let cli = Cli::parse_from([
            "palaver", "debate", "tabs?", "-m", "a", "-m", "b", "-r", "3", "-o", "json", "-vv",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        let Some(Command::Debate(args)) = cli.command else {
            panic!("expected debate");
        };
        assert_eq!(args.rounds, Some(3));
    }

    #[test]
    fn test_debate_requires_models() {
        assert!(Cli::try_parse_from(["palaver", "debate", "tabs?"]).is_err());
    }

    #[test]
    fn test_auto_concurrency_conflicts_with_explicit() {
        assert!(Cli::try_parse_from(["palaver", "ask", "q", "-c", "2", "--auto-concurrency"]).is_err());
    }
}
