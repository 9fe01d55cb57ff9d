//! Configuration management for NOVA
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.nova/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::errors::{NovaError, Result};
use crate::memory::types::{MAX_MOOD_HISTORY, MAX_PERSISTED_LOG};
use crate::remote::generator::DEFAULT_OLLAMA_URL;
use crate::remote::search::DEFAULT_SUMMARY_CHARS;

/// Complete configuration for NOVA
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Fuzzy matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum normalized similarity for a keyword to count as a hit.
    /// Used for both the knowledge base and learned corrections.
    pub threshold: f64,
    /// Optional JSON file replacing the built-in knowledge base
    pub knowledge_file: Option<String>,
}

/// Session memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub max_mood_history: usize,
    pub max_persisted_log: usize,
}

/// Which remote text generator to consult before the local matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteProvider {
    None,
    Ollama,
    Gemini,
}

/// Tone the remote model is asked to answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Helpful,
    Formal,
    Casual,
    Technical,
    Motivational,
}

impl Personality {
    /// Indonesian description used in the system prompt
    pub fn tone(&self) -> &'static str {
        match self {
            Personality::Helpful => "ramah, responsif, dan suka membantu",
            Personality::Formal => "profesional, formal, dan teknis",
            Personality::Casual => "santai, funny, dan conversational",
            Personality::Technical => "detail, technical, dan akurat tentang code/tech",
            Personality::Motivational => "inspiratif, memotivasi, dan positif",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Helpful => "helpful",
            Personality::Formal => "formal",
            Personality::Casual => "casual",
            Personality::Technical => "technical",
            Personality::Motivational => "motivational",
        }
    }
}

/// Remote text generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub provider: RemoteProvider,
    pub personality: Personality,
    pub ollama_url: String,
    pub ollama_model: String,
    pub gemini_model: String,
    pub timeout_secs: u64,
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub max_summary_chars: usize,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_dir: String,
    pub history_file: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: 0.65,
            knowledge_file: None,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_mood_history: 50,
            max_persisted_log: 100,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: RemoteProvider::None,
            personality: Personality::Helpful,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: "qwen2.5:7b-instruct".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 5,
            max_summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_dir: "~/.nova".to_string(),
            history_file: "~/.nova/repl_history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NovaError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| NovaError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".nova").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.matcher.threshold) {
            return Err(NovaError::ConfigError(
                "matcher.threshold must be between 0.0 and 1.0".to_string()
            ));
        }

        if !(1..=MAX_MOOD_HISTORY).contains(&self.memory.max_mood_history) {
            return Err(NovaError::ConfigError(format!(
                "memory.max_mood_history must be between 1 and {}",
                MAX_MOOD_HISTORY
            )));
        }

        if !(1..=MAX_PERSISTED_LOG).contains(&self.memory.max_persisted_log) {
            return Err(NovaError::ConfigError(format!(
                "memory.max_persisted_log must be between 1 and {}",
                MAX_PERSISTED_LOG
            )));
        }

        if self.remote.timeout_secs == 0 || self.search.timeout_secs == 0 {
            return Err(NovaError::ConfigError(
                "timeouts must be at least one second".to_string()
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| NovaError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| NovaError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| NovaError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get state directory path
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.state_dir)
    }

    /// Get REPL history file path
    pub fn history_file(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }

    /// Get knowledge base override path, if any
    pub fn knowledge_file(&self) -> Option<PathBuf> {
        self.matcher.knowledge_file.as_deref().map(Self::expand_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.matcher.threshold, 0.65);
        assert_eq!(config.memory.max_mood_history, 50);
        assert_eq!(config.memory.max_persisted_log, 100);
        assert_eq!(config.remote.provider, RemoteProvider::None);
        assert!(config.search.enabled);
        assert_eq!(config.search.max_summary_chars, DEFAULT_SUMMARY_CHARS);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_threshold() {
        let mut config = Config::default();
        config.matcher.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_mood_history() {
        let mut config = Config::default();
        config.memory.max_mood_history = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_mood_history_above_cap() {
        let mut config = Config::default();
        config.memory.max_mood_history = MAX_MOOD_HISTORY + 1;
        assert!(config.validate().is_err());

        config.memory.max_mood_history = MAX_MOOD_HISTORY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_persisted_log_bounds() {
        let mut config = Config::default();
        config.memory.max_persisted_log = 0;
        assert!(config.validate().is_err());

        config.memory.max_persisted_log = MAX_PERSISTED_LOG + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.search.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            "[matcher]\nthreshold = 0.7\n\n[remote]\nprovider = \"ollama\"\n",
        )
        .unwrap();
        assert_eq!(config.matcher.threshold, 0.7);
        assert_eq!(config.remote.provider, RemoteProvider::Ollama);
        assert_eq!(config.remote.personality, Personality::Helpful);
        assert_eq!(config.remote.timeout_secs, 15);
        assert_eq!(config.memory.max_persisted_log, 100);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.remote.provider = RemoteProvider::Gemini;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.remote.provider, RemoteProvider::Gemini);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[matcher]\nthreshold = \"high\"\n").unwrap();
        assert!(matches!(Config::load_from_file(&path), Err(NovaError::ConfigError(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.nova");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let path = "/absolute/path";
        assert_eq!(Config::expand_path(path).to_string_lossy(), path);
    }
}
