//! CLI entrypoint for palaver
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use palaver_application::{CompositeSink, EventSink, ForumService, SessionId};
use palaver_domain::{
    DebatePhase, ModelId, OutputFormat, PromptTemplate, QuestionKind, SummaryResult,
};
use palaver_infrastructure::{ConfigLoader, FileConfig, HostProbe, JsonlEventLogger, OllamaBackend};
use palaver_presentation::{
    AskArgs, Cli, Command, ConsoleFormatter, DebateArgs, ModelsArgs, ProgressReporter,
    ResourcesArgs, SimpleProgress, StreamPrinter,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        return show_config(&cli);
    }

    let file_config = load_config(&cli)?;
    let _log_guard = init_logging(cli.verbose, cli.quiet, file_config.logging.file_path().as_deref());

    info!("Starting palaver");

    for warning in file_config.check()? {
        warn!("{}", warning);
    }
    if !file_config.output.color {
        ConsoleFormatter::set_color(false);
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file_config.output.format)
        .unwrap_or_default();

    // === Dependency Injection ===
    let mut forum_config = file_config.to_forum_config();
    if let Command::Models(ModelsArgs { all: true, .. }) = &command {
        forum_config.catalog.policy = forum_config.catalog.policy.with_filter_ultra_large(false);
    }
    let backend = Arc::new(
        OllamaBackend::new(file_config.backend.to_ollama_config())
            .context("Failed to set up the Ollama client")?,
    );
    let service = Arc::new(ForumService::new(backend, Arc::new(HostProbe::new()), forum_config));
    let session = SessionId::local();
    spawn_interrupt_handler(Arc::clone(&service), session.clone());

    let event_log = file_config
        .logging
        .event_log_path()
        .and_then(JsonlEventLogger::new);
    if let Some(logger) = &event_log {
        info!("Recording events to {}", logger.path().display());
    }

    let ctx = Invocation {
        service: &service,
        session: &session,
        format,
        quiet: cli.quiet,
        event_log: event_log.as_ref().map(|l| l as &dyn EventSink),
    };

    match command {
        Command::Models(args) => run_models(&ctx, args).await,
        Command::Ask(args) => run_ask(&ctx, args).await,
        Command::Debate(args) => run_debate(&ctx, args).await,
        Command::Resources(args) => run_resources(&ctx, args).await,
    }
}

/// Everything a command needs from `main`.
struct Invocation<'a> {
    service: &'a ForumService,
    session: &'a SessionId,
    format: OutputFormat,
    quiet: bool,
    event_log: Option<&'a dyn EventSink>,
}

impl<'a> Invocation<'a> {
    /// Combine the event log with whatever the command shows on the terminal.
    fn sinks<'s>(&self, terminal: Vec<&'s dyn EventSink>) -> CompositeSink<'s>
    where
        'a: 's,
    {
        CompositeSink::new(terminal.into_iter().chain(self.event_log).collect())
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    println!("Configuration sources (lowest to highest priority):");
    for source in ConfigLoader::describe_sources() {
        println!("  {}", source);
    }
    let config = load_config(cli)?;
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))
}

/// `RUST_LOG` wins over the verbosity flags; an optional log file receives the same events.
fn init_logging(verbose: u8, quiet: bool, file: Option<&Path>) -> Option<WorkerGuard> {
    let level = match (quiet, verbose) {
        (true, 0) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match file.and_then(|path| path.file_name().map(|name| (path, name))) {
        Some((path, name)) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// First Ctrl-C cancels the running operation; a second one exits.
fn spawn_interrupt_handler(service: Arc<ForumService>, session: SessionId) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        eprintln!("\nInterrupted, stopping (press Ctrl-C again to exit immediately)");
        service.cancel(&session);

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

// ==================== Commands ====================

async fn run_models(ctx: &Invocation<'_>, args: ModelsArgs) -> Result<()> {
    let models = ctx.service.list_models(args.refresh).await;
    if models.is_empty() {
        warn!("No models available; is Ollama running?");
    }
    let estimates: Vec<_> = models.iter().map(|m| ctx.service.estimate_model(m)).collect();

    let output = match ctx.format {
        OutputFormat::Json => ConsoleFormatter::format_json(&estimates),
        _ => ConsoleFormatter::format_models(&estimates, &ctx.service.config().catalog.policy),
    };
    println!("{}", output);
    Ok(())
}

async fn run_ask(ctx: &Invocation<'_>, args: AskArgs) -> Result<()> {
    let kind = if args.coding {
        QuestionKind::Coding
    } else {
        QuestionKind::General
    };

    let mut models = if args.model.is_empty() {
        ctx.service.models_for(kind, false).await
    } else {
        parse_models(&args.model)
    };
    if models.is_empty() {
        bail!("No models to ask. Pull a model with `ollama pull <name>` or pass --model.");
    }

    let concurrency = if args.auto_concurrency {
        let (concurrency, fits) = ctx.service.recommend_concurrency(&models).await;
        models = fits;
        info!("Auto concurrency: {}", concurrency);
        Some(concurrency)
    } else {
        args.concurrency
    };

    let stream = !args.no_stream && ctx.format != OutputFormat::Json;
    let prompt = PromptTemplate::enhance(&args.question, kind);
    let request = ctx.service.build_request(prompt, models, concurrency, stream)?;

    let printer = StreamPrinter::stdout();
    let simple = SimpleProgress;
    let reporter = ProgressReporter::new();
    let mut terminal: Vec<&dyn EventSink> = Vec::new();
    if stream {
        terminal.push(&printer);
        if !ctx.quiet {
            terminal.push(&simple);
        }
    } else if !ctx.quiet && ctx.format != OutputFormat::Json {
        terminal.push(&reporter);
    }
    let sink = ctx.sinks(terminal);

    let results = ctx
        .service
        .dispatch_query(ctx.session, &request, Some(&sink))
        .await;

    let output = match ctx.format {
        OutputFormat::Json => ConsoleFormatter::format_json(&results),
        // streamed answers are already on screen
        OutputFormat::Full if stream => ConsoleFormatter::format_results_summary(&results),
        OutputFormat::Full => ConsoleFormatter::format_results(&args.question, &results),
        OutputFormat::Summary => ConsoleFormatter::format_results_summary(&results),
    };
    println!("{}", output);

    if !results.iter().any(|r| r.is_success()) {
        bail!("No model produced an answer");
    }
    Ok(())
}

async fn run_debate(ctx: &Invocation<'_>, args: DebateArgs) -> Result<()> {
    let participants = parse_models(&args.model);
    let rounds = args
        .rounds
        .unwrap_or(ctx.service.config().debate.default_rounds);

    let printer = StreamPrinter::stdout();
    let simple = SimpleProgress;
    let mut terminal: Vec<&dyn EventSink> = Vec::new();
    if ctx.format != OutputFormat::Json {
        terminal.push(&printer);
        if !ctx.quiet {
            terminal.push(&simple);
        }
    }
    let sink = ctx.sinks(terminal);

    let handle = ctx
        .service
        .start_debate(ctx.session, &args.topic, participants, rounds, &sink)
        .await?;

    let session = ctx
        .service
        .debate_snapshot(&handle)
        .await
        .context("Debate disappeared before it could be reported")?;
    let summary: Option<SummaryResult> = ctx.service.get_summary(&handle).await;
    let consensus = ctx
        .service
        .get_consensus(&handle)
        .await
        .context("Debate disappeared before it could be reported")?;

    let output = match ctx.format {
        OutputFormat::Json => ConsoleFormatter::format_json(&serde_json::json!({
            "debate": session,
            "summary": summary,
            "consensus": consensus,
        })),
        OutputFormat::Full => ConsoleFormatter::format_debate(&session, summary.as_ref(), &consensus),
        OutputFormat::Summary => {
            ConsoleFormatter::format_debate_summary(&session, summary.as_ref(), &consensus)
        }
    };
    println!("{}", output);

    if session.phase() == DebatePhase::Cancelled {
        warn!("Debate was cancelled after {} argument(s)", session.arguments().len());
    }
    Ok(())
}

async fn run_resources(ctx: &Invocation<'_>, args: ResourcesArgs) -> Result<()> {
    let profile = ctx.service.estimate_resources().await;
    let models = if args.model.is_empty() {
        ctx.service.list_models(false).await
    } else {
        parse_models(&args.model)
    };
    let estimates: Vec<_> = models.iter().map(|m| ctx.service.estimate_model(m)).collect();
    let recommendation = ctx.service.recommend_concurrency(&models).await;
    let sequential = ctx.service.should_run_sequentially(&models).await;

    let output = match ctx.format {
        OutputFormat::Json => ConsoleFormatter::format_json(&serde_json::json!({
            "system": profile,
            "estimates": estimates,
            "recommended_concurrency": recommendation.0,
            "recommended_models": recommendation.1,
            "run_sequentially": sequential,
        })),
        _ => ConsoleFormatter::format_resources(&profile, &estimates, &recommendation, sequential),
    };
    println!("{}", output);
    Ok(())
}

fn parse_models(names: &[String]) -> Vec<ModelId> {
    names.iter().map(|s| ModelId::new(s.trim())).collect()
}
