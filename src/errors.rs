//! Error types for NOVA
//!
//! Every failure inside a turn is recoverable; these variants exist so the
//! collaborators can report what went wrong before the pipeline degrades.

use thiserror::Error;

/// Main error type for the NOVA assistant
#[derive(Error, Debug)]
pub enum NovaError {
    /// Knowledge base loading or validation errors
    #[error("Invalid knowledge base: {0}")]
    KnowledgeBase(String),

    /// Blob store read/write errors
    #[error("Persistence error for key '{key}': {reason}")]
    Persistence { key: String, reason: String },

    /// Remote text generation errors
    #[error("Remote model error: {0}")]
    RemoteModel(String),

    /// Web search errors
    #[error("Search error: {0}")]
    Search(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for NOVA operations
pub type Result<T> = std::result::Result<T, NovaError>;
