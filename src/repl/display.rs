//! Display manager for the REPL terminal UI
//!
//! Replies go to stdout; the thinking spinner is drawn on stderr and cleared
//! before a reply is printed.

use colored::*;
use crossterm::{
    cursor,
    execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::responder::{Reply, ReplySource};
use crate::sentiment::Sentiment;

/// Display manager for REPL UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    update_interval: Duration,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            update_interval: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, remote: &str, user: Option<&str>) {
        let width = 64;
        let top = format!("{}", "=".repeat(width).cyan());
        let title = format!("  NOVA {} - Asisten Lokal dengan Ingatan", version);
        let info = format!("  Remote: {} | Memory: Enabled | Mode: REPL", remote);
        let bottom = format!("{}", "=".repeat(width).cyan());

        println!("\n{}", top);
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", bottom);
        if let Some(name) = user {
            println!("Selamat datang kembali, {}!", name.bold());
        }
        println!("Ketik pesan (atau {} untuk perintah, {} untuk keluar)\n",
            "/help".green(), "/exit".green());
    }

    /// Start the spinner shown while a turn is running
    pub fn start_thinking(&mut self) -> ProgressBar {
        self.finish_current();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("NOVA sedang berpikir...");
        pb.enable_steady_tick(self.update_interval);

        self.current_bar = Some(pb.clone());
        pb
    }

    /// Finish current spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a reply, optionally tagged with the route that produced it
    pub fn show_reply(&mut self, reply: &Reply, show_route: bool) {
        self.finish_current();

        println!("{} {}", "NOVA:".magenta().bold(), reply.text);
        if show_route {
            println!("{}", format!("  [{} | {}]", route_label(&reply.source), reply.sentiment).dimmed());
        }
        println!();
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(
            io::stdout(),
            Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }

    /// Show bullet point
    pub fn show_bullet(&self, text: &str) {
        println!("  {} {}", "•".cyan(), text);
    }

    /// Show numbered item
    pub fn show_numbered(&self, index: usize, text: &str) {
        println!("  {}. {}", index.to_string().cyan(), text);
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Short label for a reply route
pub fn route_label(source: &ReplySource) -> String {
    match source {
        ReplySource::Remote => "remote".to_string(),
        ReplySource::CorrectionLearned => "correction".to_string(),
        ReplySource::NameRecall => "name".to_string(),
        ReplySource::Mood => "mood".to_string(),
        ReplySource::Greeting => "greeting".to_string(),
        ReplySource::Support => "support".to_string(),
        ReplySource::Math => "math".to_string(),
        ReplySource::Learned => "learned".to_string(),
        ReplySource::Knowledge { topic } => format!("knowledge:{}", topic),
        ReplySource::Search => "search".to_string(),
        ReplySource::ContextRecall => "recall".to_string(),
        ReplySource::Default => "default".to_string(),
    }
}

/// Colored sentiment tag for history listings
pub fn sentiment_tag(sentiment: Sentiment) -> ColoredString {
    match sentiment {
        Sentiment::Positive => "positive".green(),
        Sentiment::Negative => "negative".red(),
        Sentiment::Neutral => "neutral".normal(),
        Sentiment::Question => "question".cyan(),
    }
}
