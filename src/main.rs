//! NOVA - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

use nova::{
    assistant::Assistant,
    cli::{Args, Commands, Verbosity},
    config::Config,
    matcher::KnowledgeBase,
    memory::{BlobStore, JsonFileStore, MemoryLimits, MemoryStore, SessionMemory},
    repl::{
        commands::{show_corrections, show_profile},
        DisplayManager, ReplSession,
    },
    responder::Responder,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate().map_err(|e| anyhow::anyhow!(e))?;

    telemetry::init_tracing(args.verbosity().log_filter())?;

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate()?;

    match args.command_or_default() {
        Some(Commands::Start) => run_repl(&args, &config).await?,
        Some(Commands::Memory) => show_memory(&args, &config)?,
        Some(Commands::Config) => show_config(&args, &config)?,
        Some(Commands::Clean { history }) => clean_state(&config, history)?,
        None => {
            if let Some(message) = &args.message {
                run_turn(&args, &config, message).await?;
            }
        }
    }

    Ok(())
}

/// Wire the assistant from configuration and command-line flags
fn build_assistant(args: &Args, config: &Config) -> Result<Assistant> {
    let knowledge = match config.knowledge_file() {
        Some(path) => KnowledgeBase::from_json_file(&path)
            .with_context(|| format!("Failed to load knowledge base {:?}", path))?,
        None => KnowledgeBase::builtin(),
    };

    let mut responder = Responder::from_config(config, knowledge)?;
    if let Some(seed) = args.seed {
        responder = responder.with_seed(seed);
    }

    let store: Arc<dyn BlobStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let dir = config.state_dir();
        Arc::new(JsonFileStore::new(&dir).with_context(|| format!("Failed to open state directory {:?}", dir))?)
    };

    Ok(Assistant::new(responder, store))
}

/// Answer a single message and exit
async fn run_turn(args: &Args, config: &Config, message: &str) -> Result<()> {
    let mut assistant = build_assistant(args, config)?;
    let verbosity = args.verbosity();

    let mut display = DisplayManager::new();
    if verbosity.show_progress() {
        display.start_thinking();
    }
    let reply = assistant.turn(message).await;

    if verbosity == Verbosity::Quiet {
        display.finish_current();
        println!("{}", reply.text);
    } else {
        display.show_reply(&reply, verbosity.show_routes());
    }
    Ok(())
}

/// Run the interactive REPL
async fn run_repl(args: &Args, config: &Config) -> Result<()> {
    let assistant = build_assistant(args, config)?;
    let mut session = ReplSession::with_history(assistant, args.verbosity(), config.history_file())?;

    session.show_welcome(env!("CARGO_PKG_VERSION"));
    session.run().await
}

/// Print what the session memory holds
fn show_memory(args: &Args, config: &Config) -> Result<()> {
    let assistant = build_assistant(args, config)?;
    let state = assistant.state();
    let display = DisplayManager::new();

    show_profile(&state, &display);
    show_corrections(&state, &display);
    Ok(())
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "NOVA Configuration".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    match (&args.config, Config::default_path()) {
        (Some(path), _) => println!("File:      {:?}", path),
        (None, Some(path)) if path.exists() => println!("File:      {:?}", path),
        _ => println!("File:      (built-in defaults)"),
    }
    println!("State dir: {:?}", config.state_dir());
    println!("Verbosity: {}", args.verbosity().as_str());
    println!();

    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

/// Delete the session memory blobs; the config file and REPL history stay
fn clean_state(config: &Config, history: bool) -> Result<()> {
    let state_dir = config.state_dir();

    if state_dir.exists() {
        let store = JsonFileStore::new(&state_dir)
            .with_context(|| format!("Failed to open state directory {:?}", state_dir))?;
        SessionMemory::new(Arc::new(store), MemoryLimits::from(&config.memory)).clear()?;
        println!("{} Cleaned session memory in {:?}", "✓".green(), state_dir);
    } else {
        println!("No state directory found.");
    }

    let history_file = config.history_file();
    if history && history_file.exists() {
        std::fs::remove_file(&history_file)?;
        println!("{} Removed history file: {:?}", "✓".green(), history_file);
    }

    Ok(())
}
