//! NOVA v0.3.0 - Local Assistant with Session Memory
//!
//! A terminal assistant that answers from a built-in knowledge base using
//! fuzzy keyword matching, learns corrections and facts from the user, and
//! remembers them across sessions.
//!
//! # Architecture
//!
//! - **Matcher**: Levenshtein similarity over a keyword knowledge base
//! - **Memory**: profile, mood, conversation log and learned corrections
//!   persisted as JSON blobs
//! - **Responder**: ordered reply pipeline with optional remote model and
//!   web search fallbacks
//! - **REPL / CLI**: interactive chat and one-shot messages

pub mod errors;
pub mod config;
pub mod sentiment;
pub mod matcher;
pub mod memory;
pub mod remote;
pub mod responder;
pub mod assistant;

// Interface layer
pub mod cli;
pub mod repl;
pub mod telemetry;

// Re-export commonly used types
pub use assistant::Assistant;
pub use config::Config;
pub use errors::{NovaError, Result};
pub use responder::{Reply, ReplySource, Responder};
