//! Command handler for REPL built-in commands
//!
//! Commands start with `/`; everything else is a chat message.

use anyhow::Result;
use colored::*;

use crate::assistant::Assistant;
use crate::memory::SessionState;
use crate::repl::display::{sentiment_tag, DisplayManager};

/// Default number of log entries for `/history`
const DEFAULT_HISTORY: usize = 10;

/// Canonical command spellings offered by tab completion
pub const COMMAND_NAMES: &[&str] = &[
    "/help",
    "/history",
    "/mood",
    "/profile",
    "/corrections",
    "/forget",
    "/reset",
    "/clear",
    "/exit",
    "/quit",
];

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    History { limit: Option<usize> },
    Mood,
    Profile,
    Corrections,
    Forget { question: String },
    Reset,
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Command handler for parsing and executing REPL commands
#[derive(Debug, Default)]
pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown { input: input.to_string() };
        };

        let mut parts = body.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().map(str::trim).unwrap_or("");

        match name.as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "history" => Command::History { limit: rest.parse().ok() },
            "mood" => Command::Mood,
            "profile" => Command::Profile,
            "corrections" => Command::Corrections,
            "forget" if !rest.is_empty() => Command::Forget { question: rest.to_string() },
            "reset" => Command::Reset,
            "clear" | "cls" => Command::Clear,
            _ => Command::Unknown { input: input.to_string() },
        }
    }

    /// Execute a command
    ///
    /// Returns true if REPL should continue, false if should exit
    pub fn execute(&self, command: Command, assistant: &Assistant, display: &DisplayManager) -> Result<bool> {
        match command {
            Command::Help => {
                self.show_help();
                Ok(true)
            }
            Command::Exit => {
                println!("{}", "Sampai jumpa!".green());
                Ok(false)
            }
            Command::History { limit } => {
                self.show_history(&assistant.state(), limit.unwrap_or(DEFAULT_HISTORY), display);
                Ok(true)
            }
            Command::Mood => {
                let state = assistant.state();
                println!("{}", crate::responder::replies::mood_report(&state.profile));
                Ok(true)
            }
            Command::Profile => {
                show_profile(&assistant.state(), display);
                Ok(true)
            }
            Command::Corrections => {
                show_corrections(&assistant.state(), display);
                Ok(true)
            }
            Command::Forget { question } => {
                match assistant.forget_correction(&question)? {
                    Some(answer) => display.show_info(&format!("Lupa: \"{}\" → {}", question, answer)),
                    None => display.show_warning(&format!("Tidak ada koreksi untuk \"{}\"", question)),
                }
                Ok(true)
            }
            Command::Reset => {
                assistant.reset()?;
                println!("{}", "Ingatan dihapus. Mulai dari awal.".yellow());
                Ok(true)
            }
            Command::Clear => {
                display.clear_screen()?;
                Ok(true)
            }
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
                Ok(true)
            }
        }
    }

    /// Display help information
    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/history [n]", "Show last n messages (default: 10)"),
            ("/mood", "Show average mood and trend"),
            ("/profile", "Show what NOVA knows about you"),
            ("/corrections", "List learned corrections"),
            ("/forget <question>", "Forget one learned correction"),
            ("/reset", "Forget everything"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Exit REPL"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Type your message directly (no / prefix)");
        println!("  - Teach NOVA: {}", "\"ibukota indonesia seharusnya: Jakarta\"".cyan());
        println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
        println!();
    }

    /// Display the conversation log
    fn show_history(&self, state: &SessionState, limit: usize, display: &DisplayManager) {
        let recent = state.recent_log(limit);
        if recent.is_empty() {
            println!("{}", "Belum ada percakapan.".yellow());
            return;
        }

        display.show_section(&format!("Riwayat (last {}):", recent.len()));
        for (i, entry) in recent.iter().enumerate() {
            let when = entry.timestamp.with_timezone(&chrono::Local).format("%d/%m %H:%M");
            display.show_numbered(
                i + 1,
                &format!("{} {} {}", when.to_string().dimmed(), entry.text, sentiment_tag(entry.sentiment)),
            );
        }
        println!();
    }
}

/// Print the profile and learned contexts
pub fn show_profile(state: &SessionState, display: &DisplayManager) {
    display.show_section("Profil");
    let name = state.profile.name.as_deref().unwrap_or("(belum dikenal)");
    display.show_bullet(&format!("Nama: {}", name));
    display.show_bullet(&format!("Mood rata-rata: {}", state.profile.average_mood));
    display.show_bullet(&format!("Sampel mood: {}", state.profile.mood_history.len()));
    display.show_bullet(&format!("Pesan tersimpan: {}", state.log.len()));

    if !state.contexts.is_empty() {
        display.show_section("Konteks yang dipelajari");
        for (subject, definitions) in state.contexts.iter() {
            display.show_bullet(&format!("{}: {}", subject.bold(), definitions.join("; ")));
        }
    }
    println!();
}

/// Print learned corrections
pub fn show_corrections(state: &SessionState, display: &DisplayManager) {
    if state.corrections.is_empty() {
        println!("{}", "Belum ada koreksi yang dipelajari.".yellow());
        return;
    }

    display.show_section(&format!("Koreksi ({}):", state.corrections.len()));
    for (question, answer) in state.corrections.iter() {
        display.show_bullet(&format!("{} → {}", question.green(), answer));
    }
    println!();
}
