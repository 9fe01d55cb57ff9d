//! Command-line argument parsing for NOVA
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// NOVA - a local Indonesian chat assistant with memory
#[derive(Parser, Debug)]
#[command(name = "nova")]
#[command(version)]
#[command(about = "Local fuzzy-intent chat assistant with persistent session memory", long_about = None)]
pub struct Args {
    /// Message to answer (single turn)
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the session memory
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Knowledge base JSON file replacing the built-in table
    #[arg(long)]
    pub knowledge: Option<PathBuf>,

    /// Never call the remote model or web search
    #[arg(long)]
    pub offline: bool,

    /// Keep the session in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Seed for follow-up and default reply selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only print replies)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive REPL mode
    Start,

    /// Show what NOVA remembers about you
    Memory,

    /// Display current configuration
    Config,

    /// Delete the session memory
    Clean {
        /// Also remove the REPL history file
        #[arg(long)]
        history: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// A message and a subcommand are mutually exclusive
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_some() && self.message.is_some() {
            return Err("Cannot specify a message with a subcommand.".to_string());
        }

        if matches!(&self.message, Some(m) if m.trim().is_empty()) {
            return Err("Message must not be empty.".to_string());
        }

        Ok(())
    }

    /// Fold command-line overrides into the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.state_dir {
            config.paths.state_dir = dir.to_string_lossy().into_owned();
        }
        if let Some(file) = &self.knowledge {
            config.matcher.knowledge_file = Some(file.to_string_lossy().into_owned());
        }
        if self.offline {
            config.remote.provider = crate::config::RemoteProvider::None;
            config.search.enabled = false;
        }
    }

    /// Without a message or subcommand, start the REPL
    pub fn command_or_default(&self) -> Option<Commands> {
        match (&self.command, &self.message) {
            (Some(command), _) => Some(command.clone()),
            (None, Some(_)) => None,
            (None, None) => Some(Commands::Start),
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show the thinking spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if replies should be tagged with their route
    pub fn show_routes(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }

    /// Default tracing filter for this verbosity
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "nova=info",
            Verbosity::VeryVerbose => "nova=debug",
        }
    }
}
