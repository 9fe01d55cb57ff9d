//! Fuzzy Intent Matcher
//!
//! Components:
//! - Levenshtein: edit distance and normalized similarity
//! - Knowledge: the static keyword → answer table
//! - Fuzzy: best-score selection over the table
//! - Follow-up: topic-keyed prompts appended to answers

pub mod followup;
pub mod fuzzy;
pub mod knowledge;
pub mod levenshtein;

pub use followup::FollowUpCategory;
pub use fuzzy::{best_fuzzy, normalize, IntentMatcher, KeywordScore, MatchResult, DEFAULT_THRESHOLD};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use levenshtein::{levenshtein, similarity};
