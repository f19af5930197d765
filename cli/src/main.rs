//! CLI entrypoint for ParallelAI
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use parallelai_application::{
    ChatError, ChatService, ConversationLogger, ConversationRecorder, NoProgress,
    ProgressNotifier,
};
use parallelai_domain::{Model, ProviderRegistry};
use parallelai_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, GroqGateway, InMemoryConversationStore,
    JsonFileConversationStore, JsonlConversationLogger, RegistryBuilder,
};
use parallelai_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_CONFIG: u8 = 2;
const EXIT_UNAVAILABLE: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Credentials usually live in .env; a missing file is fine
    let dotenv = dotenvy::dotenv();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(chat) = e.downcast_ref::<ChatError>()
                && chat.is_unavailable()
            {
                eprintln!("Service unavailable: {}", chat);
                return ExitCode::from(EXIT_UNAVAILABLE);
            }
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Install the tracing subscriber.
///
/// `-v` picks the level unless `RUST_LOG` is set. With a log directory,
/// a daily rolling file receives the same events.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "parallelai.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

async fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    for issue in config.validate().iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }

    // Every provider needs its credential before anything is served
    let registry = Arc::new(RegistryBuilder::from_env().build(&config)?);
    info!("Starting ParallelAI with {} models", registry.len());

    let service = build_service(&config, Arc::clone(&registry))?;
    let progress = progress_for(&cli);
    let caller = cli.caller();
    let history_query = command.history_query();

    let output = match command {
        Command::Ask {
            question,
            consensus,
            model: None,
            ..
        } => {
            let outcome = service
                .multi_with_progress(&caller, &question, consensus, progress.as_ref())
                .await?;
            ConsoleFormatter::multi(&question, &outcome, cli.output)
        }
        Command::Ask {
            question,
            model: Some(model),
            max_tokens,
            ..
        } => {
            let outcome = service
                .single_with_progress(
                    &caller,
                    &question,
                    Model::from(model.as_str()),
                    max_tokens,
                    progress.as_ref(),
                )
                .await?;
            ConsoleFormatter::single(&question, &outcome, cli.output)
        }
        Command::Consensus { entry_id } => {
            let outcome = service
                .consensus_for_entry_with_progress(&caller, entry_id, progress.as_ref())
                .await?;
            ConsoleFormatter::consensus(&outcome, cli.output)
        }
        Command::History { limit, .. } => {
            let entries: Vec<_> = service
                .history(&caller, &history_query)
                .await?
                .into_iter()
                .take(limit)
                .collect();
            ConsoleFormatter::history(&entries, cli.output)
        }
        Command::Models => ConsoleFormatter::models(&registry, cli.output),
    };

    print!("{}", output);
    Ok(())
}

fn build_service(
    config: &FileConfig,
    registry: Arc<ProviderRegistry>,
) -> Result<ChatService<GroqGateway>> {
    let gateway = Arc::new(
        GroqGateway::new(&config.gateway).context("Failed to create provider gateway")?,
    );

    let recorder: Arc<dyn ConversationRecorder> =
        match config.history.resolved_dir().filter(|_| config.history.persist) {
            Some(dir) => {
                info!("History directory: {}", dir.display());
                Arc::new(JsonFileConversationStore::new(dir))
            }
            None => Arc::new(InMemoryConversationStore::new()),
        };

    let params = config.orchestration.to_orchestration_params();

    let transcript = config
        .logging
        .transcript
        .as_ref()
        .and_then(JsonlConversationLogger::open);

    Ok(match transcript {
        Some(logger) => {
            info!("Transcript: {}", logger.path().display());
            let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
            ChatService::with_logger(gateway, registry, recorder, params, logger)
        }
        None => ChatService::new(gateway, registry, recorder, params),
    })
}

fn progress_for(cli: &Cli) -> Box<dyn ProgressNotifier> {
    if cli.quiet || cli.output == OutputFormat::Json {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}
