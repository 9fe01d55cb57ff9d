//! REPL (Read-Eval-Print Loop) module for interactive chat
//!
//! Lines starting with `/` are built-in commands; everything else is one turn
//! of the assistant. Session memory is saved after every turn, line history
//! when the loop ends.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

use crate::assistant::Assistant;
use crate::cli::Verbosity;
use crate::repl::commands::{is_command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::InputHandler;

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
    assistant: Assistant,
    verbosity: Verbosity,
}

impl ReplSession {
    /// Create new REPL session without persistent line history
    pub fn new(assistant: Assistant, verbosity: Verbosity) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::new()?,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            assistant,
            verbosity,
        })
    }

    /// Create REPL session with persistent line history
    pub fn with_history(assistant: Assistant, verbosity: Verbosity, history_path: PathBuf) -> Result<Self> {
        let mut session = Self::new(assistant, verbosity)?;
        session.input_handler = InputHandler::with_history(history_path)?;
        Ok(session)
    }

    /// Show welcome banner
    pub fn show_welcome(&mut self, version: &str) {
        let responder = self.assistant.responder();
        let remote = match (responder.has_generator(), responder.has_search()) {
            (true, true) => "model + search",
            (true, false) => "model",
            (false, true) => "search",
            (false, false) => "offline",
        };
        let state = self.assistant.state();
        if let Some(name) = state.profile.name.as_deref() {
            self.input_handler.set_prompt(format!("{}> ", name));
        }
        self.display_manager.show_banner(version, remote, state.profile.name.as_deref());
    }

    /// Handle one line of input
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self
                .command_handler
                .execute(command, &self.assistant, &self.display_manager);
        }

        if self.verbosity.show_progress() {
            self.display_manager.start_thinking();
        }
        let reply = self.assistant.turn(input).await;
        self.display_manager.show_reply(&reply, self.verbosity.show_routes());

        Ok(true)
    }

    /// Run until `/exit` or Ctrl-D
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.input_handler.read_line() {
                Ok(Some(line)) => {
                    if !self.handle_input(&line).await? {
                        break;
                    }
                }
                Ok(None) => {
                    println!("{}", "Sampai jumpa!".green());
                    break;
                }
                Err(e) if e.to_string() == "Interrupted" => {
                    println!("{}", "(Ctrl-C) Ketik /exit atau tekan Ctrl-D untuk keluar.".dimmed());
                }
                Err(e) => {
                    self.save()?;
                    return Err(e);
                }
            }
        }

        self.save()
    }

    /// Persist line history
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()?;
        debug!(entries = self.input_handler.history_len(), "saved line history");
        Ok(())
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn display(&self) -> &DisplayManager {
        &self.display_manager
    }
}
