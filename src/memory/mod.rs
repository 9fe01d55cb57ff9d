//! Session Memory Store
//!
//! This module implements the per-user memory consulted around every turn.
//!
//! Components:
//! - Types: profile, mood history, conversation log, session state
//! - Corrections: learned Q→A overrides and learned definitions
//! - Store: key-value JSON blob persistence (files or in-process)
//! - Session: lenient load, per-turn recording, full-overwrite save

pub mod corrections;
pub mod session;
pub mod store;
pub mod types;

pub use corrections::{
    extract_definition, extract_name, parse_correction, Correction, CorrectionHit, LearnedContexts,
    LearnedCorrections,
};
pub use session::SessionMemory;
pub use store::{BlobStore, JsonFileStore, MemoryStore};
pub use types::{
    ConversationEntry, MemoryLimits, MoodEntry, SessionProfile, SessionState, MAX_MOOD_HISTORY,
    MAX_PERSISTED_LOG,
};
