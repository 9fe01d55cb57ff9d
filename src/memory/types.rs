//! Core data types for the Session Memory Store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::corrections::{LearnedContexts, LearnedCorrections};
use crate::sentiment::{majority_mood, Sentiment};

/// Maximum mood samples kept on the profile
pub const MAX_MOOD_HISTORY: usize = 50;

/// Maximum conversation entries kept (and persisted)
pub const MAX_PERSISTED_LOG: usize = 100;

/// Prefix of the log line recorded for a web search
pub const SEARCH_MARKER: &str = "[SEARCH: ";

/// Size limits applied when recording and persisting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    pub max_mood_history: usize,
    pub max_persisted_log: usize,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            max_mood_history: MAX_MOOD_HISTORY,
            max_persisted_log: MAX_PERSISTED_LOG,
        }
    }
}

/// Configured limits, clamped to `1..=MAX_*`
impl From<&crate::config::MemoryConfig> for MemoryLimits {
    fn from(config: &crate::config::MemoryConfig) -> Self {
        Self {
            max_mood_history: config.max_mood_history.clamp(1, MAX_MOOD_HISTORY),
            max_persisted_log: config.max_persisted_log.clamp(1, MAX_PERSISTED_LOG),
        }
    }
}

/// One mood sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub sentiment: Sentiment,
    pub timestamp: DateTime<Utc>,
}

/// What the assistant knows about the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionProfile {
    pub name: Option<String>,
    pub mood_history: Vec<MoodEntry>,
    pub average_mood: Sentiment,
}

impl SessionProfile {
    /// Append a mood sample, drop the oldest beyond `cap`, refresh the average
    pub fn track_mood(&mut self, sentiment: Sentiment, timestamp: DateTime<Utc>, cap: usize) {
        self.mood_history.push(MoodEntry { sentiment, timestamp });
        if self.mood_history.len() > cap {
            let excess = self.mood_history.len() - cap;
            self.mood_history.drain(..excess);
        }
        self.average_mood = majority_mood(self.mood_history.iter().map(|m| m.sentiment));
    }

    /// Last `n` mood samples, oldest first
    pub fn recent_moods(&self, n: usize) -> &[MoodEntry] {
        let start = self.mood_history.len().saturating_sub(n);
        &self.mood_history[start..]
    }
}

/// One line of the conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub text: String,
    pub sentiment: Sentiment,
    pub timestamp: DateTime<Utc>,
}

impl ConversationEntry {
    /// Bookkeeping lines such as `[SEARCH: ...]` are not user utterances
    pub fn is_marker(&self) -> bool {
        self.text.starts_with(SEARCH_MARKER)
    }
}

/// The whole per-user session, loaded and flushed once per turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub profile: SessionProfile,
    pub log: Vec<ConversationEntry>,
    pub corrections: LearnedCorrections,
    pub contexts: LearnedContexts,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user turn: mood sample plus log entry
    pub fn record_turn(&mut self, text: &str, sentiment: Sentiment, limits: &MemoryLimits) {
        let now = Utc::now();
        self.profile.track_mood(sentiment, now, limits.max_mood_history);
        self.push_log(text.to_string(), sentiment, now, limits);
    }

    /// Append a log entry, dropping the oldest beyond the persisted cap
    pub fn push_log(
        &mut self,
        text: String,
        sentiment: Sentiment,
        timestamp: DateTime<Utc>,
        limits: &MemoryLimits,
    ) {
        self.log.push(ConversationEntry { text, sentiment, timestamp });
        if self.log.len() > limits.max_persisted_log {
            let excess = self.log.len() - limits.max_persisted_log;
            self.log.drain(..excess);
        }
    }

    /// Last `n` log entries, oldest first
    pub fn recent_log(&self, n: usize) -> &[ConversationEntry] {
        let start = self.log.len().saturating_sub(n);
        &self.log[start..]
    }

    /// Forget everything
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
