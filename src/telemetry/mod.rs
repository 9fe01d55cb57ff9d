//! Tracing setup for NOVA
//!
//! Events go to stderr so replies on stdout stay clean. `RUST_LOG` wins over
//! the filter derived from CLI verbosity.

use tracing_subscriber::EnvFilter;

use crate::errors::{NovaError, Result};

/// Build the filter: `RUST_LOG` if set and valid, else `default_filter`
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| NovaError::ConfigError(format!("Failed to set tracing subscriber: {}", e)))
}
