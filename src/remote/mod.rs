//! Remote collaborators: text generation models and web search
//!
//! Both are optional and both may fail at any time. The responder bounds
//! every call with a timeout and falls back to local answers.

pub mod generator;
pub mod search;

pub use generator::{GeminiGenerator, OllamaGenerator, TextGenerator};
pub use search::{
    summarize_text, translate_query_to_english, ChainedSearch, DuckDuckGoSearch, SearchHit,
    SearchSource, WebSearch, WikipediaSearch,
};

use std::time::Duration;
use tracing::warn;

use crate::config::{Personality, RemoteConfig, RemoteProvider, SearchConfig};
use crate::errors::Result;

/// Wrap a user message in the NOVA system prompt
pub fn build_prompt(personality: Personality, message: &str) -> String {
    format!(
        "Kamu adalah NOVA AI, sebuah AI assistant yang {}.\n\
         PENTING: SELALU respond dalam Bahasa Indonesia saja, tidak boleh bahasa lain apapun.\n\
         Berikan jawaban yang jelas, ringkas, informatif, dan gunakan emoji. HANYA Bahasa Indonesia!\n\
         Personality mode: {}\n\nUser: {}",
        personality.tone(),
        personality.as_str(),
        message
    )
}

/// Build the configured text generator, if any
///
/// Gemini without `GEMINI_API_KEY` is treated as "no generator".
pub fn generator_from_config(config: &RemoteConfig) -> Result<Option<Box<dyn TextGenerator>>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        RemoteProvider::None => Ok(None),
        RemoteProvider::Ollama => Ok(Some(Box::new(OllamaGenerator::new(
            &config.ollama_url,
            &config.ollama_model,
            timeout,
        )?))),
        RemoteProvider::Gemini => match GeminiGenerator::from_env(&config.gemini_model, timeout)? {
            Some(gemini) => Ok(Some(Box::new(gemini))),
            None => {
                warn!("remote provider is gemini but GEMINI_API_KEY is not set; running locally");
                Ok(None)
            }
        },
    }
}

/// Build the web search chain, if enabled
pub fn search_from_config(config: &SearchConfig) -> Result<Option<Box<dyn WebSearch>>> {
    if !config.enabled {
        return Ok(None);
    }
    let chain = ChainedSearch::public(Duration::from_secs(config.timeout_secs), config.max_summary_chars)?;
    Ok(Some(Box::new(chain)))
}
