//! Configuration loading and validation for webdesk.
//!
//! Loads configuration from a `webdesk.toml` file with environment variable
//! overrides for API keys and the default model. Validates all settings
//! before the orchestrator is built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `webdesk.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Agent generation settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Anthropic provider (primary)
    #[serde(default)]
    pub anthropic: ProviderConfig,

    /// OpenAI-compatible provider (fallback, e.g. Gemini)
    #[serde(default)]
    pub openai_compat: ProviderConfig,

    /// Memory capacities and retention
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Knowledge-base retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Generation settings for the support agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model requested from the primary provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per generated reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-provider timeout before failing over, in seconds
    #[serde(default = "default_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            provider_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for one generation provider.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; usually supplied via environment variable instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override (OpenAI-compatible providers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model override for this provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum items held per user in short-term memory
    #[serde(default = "default_short_term_max")]
    pub short_term_max: usize,

    /// Maximum messages per session before compaction
    #[serde(default = "default_conversation_max")]
    pub conversation_max: usize,

    /// Long-term fact retention in days
    #[serde(default = "default_ttl_days")]
    pub long_term_ttl_days: u64,
}

fn default_short_term_max() -> usize {
    50
}
fn default_conversation_max() -> usize {
    20
}
fn default_ttl_days() -> u64 {
    30
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_max: default_short_term_max(),
            conversation_max: default_conversation_max(),
            long_term_ttl_days: default_ttl_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents injected into the system prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("agent", &self.agent)
            .field("anthropic", &self.anthropic)
            .field("openai_compat", &self.openai_compat)
            .field("memory", &self.memory)
            .field("retrieval", &self.retrieval)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from `webdesk.toml` in the current directory.
    ///
    /// Also checks environment variables for API keys:
    /// - `ANTHROPIC_API_KEY` for the primary provider
    /// - `GEMINI_API_KEY` for the OpenAI-compatible fallback
    /// - `WEBDESK_MODEL` overrides the agent model
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(Path::new("webdesk.toml"))?;

        if config.anthropic.api_key.is_none() {
            config.anthropic.api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }

        if config.openai_compat.api_key.is_none() {
            config.openai_compat.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("WEBDESK_MODEL") {
            config.agent.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.temperature < 0.0 || self.agent.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "agent.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tokens must be > 0".into(),
            ));
        }

        if self.memory.conversation_max < 2 {
            return Err(ConfigError::ValidationError(
                "memory.conversation_max must be at least 2".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if any provider has an API key configured.
    pub fn has_provider(&self) -> bool {
        self.anthropic.api_key.is_some() || self.openai_compat.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            anthropic: ProviderConfig::default(),
            openai_compat: ProviderConfig::default(),
            memory: MemoryConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for webdesk_core::Error {
    fn from(err: ConfigError) -> Self {
        webdesk_core::Error::Config {
            message: err.to_string(),
        }
    }
}
