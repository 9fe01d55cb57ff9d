//! Input handler for REPL using rustyline
//!
//! Line editing with persistent history and tab completion of slash commands.

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::{DefaultHistory, History};
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::path::PathBuf;

use crate::repl::commands::COMMAND_NAMES;

/// Completes `/command` words at the start of a line
#[derive(Debug, Default)]
pub struct CommandCompleter;

/// Commands starting with `prefix`; empty unless the prefix is a bare `/word`
pub fn complete_command(prefix: &str) -> Vec<&'static str> {
    if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
        return Vec::new();
    }
    let prefix = prefix.to_lowercase();
    COMMAND_NAMES
        .iter()
        .copied()
        .filter(|name| name.starts_with(prefix.as_str()))
        .collect()
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = complete_command(&line[..pos])
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Input handler managing the line editor and its history
pub struct InputHandler {
    editor: Editor<CommandCompleter, DefaultHistory>,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandCompleter));

        Ok(InputHandler {
            editor,
            history_path: None,
            prompt: "kamu> ".to_string(),
        })
    }

    /// Create input handler with persistent history
    ///
    /// A missing or unreadable history file starts an empty history.
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut handler = Self::new()?;
        if history_file.exists() {
            let _ = handler.editor.load_history(&history_file);
        }
        handler.history_path = Some(history_file);
        Ok(handler)
    }

    /// Prompt shown before each line; the REPL switches it to the user's name
    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Read a line of input from user
    ///
    /// Returns:
    /// - Ok(Some(input)) for input, trimmed (empty string for blank lines)
    /// - Ok(None) for EOF (Ctrl-D)
    /// - Err on interrupt (Ctrl-C) or other errors
    pub fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(Some(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Err(anyhow::anyhow!("Interrupted")),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Write history to disk, creating its directory
    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_prompt() {
        let handler = InputHandler::new().unwrap();
        assert_eq!(handler.prompt(), "kamu> ");
        assert!(handler.history_path.is_none());
    }

    #[test]
    fn test_custom_prompt() {
        let mut handler = InputHandler::new().unwrap();
        handler.set_prompt("Budi> ".to_string());
        assert_eq!(handler.prompt(), "Budi> ");
    }

    #[test]
    fn test_history_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let history_path = temp_dir.path().join("nested").join("history");

        {
            let mut handler = InputHandler::with_history(history_path.clone()).unwrap();
            let _ = handler.editor.add_history_entry("halo");
            let _ = handler.editor.add_history_entry("5 + 3");
            handler.save_history().unwrap();
        }

        assert!(history_path.exists());

        let handler = InputHandler::with_history(history_path).unwrap();
        assert_eq!(handler.history_len(), 2);
    }

    #[test]
    fn test_complete_command_prefixes() {
        assert_eq!(complete_command("/mo"), vec!["/mood"]);
        assert!(complete_command("/h").contains(&"/help"));
        assert!(complete_command("/h").contains(&"/history"));
        assert!(complete_command("/").len() >= 9);
    }

    #[test]
    fn test_no_completion_for_chat_or_arguments() {
        assert!(complete_command("halo").is_empty());
        assert!(complete_command("/forget ibu").is_empty());
        assert!(complete_command("/bogus").is_empty());
    }
}
