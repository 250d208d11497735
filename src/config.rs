//! Configuration loading and management for summa-pdf.
//!
//! Loads settings from `summa.toml` with environment variable overrides for
//! the API key. Every setting has a default, so the file is optional.

use crate::agent::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variables consulted for the Gemini key, in order
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Upper bound of the page limit offered to users
pub const MAX_PAGES_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// LLM provider, only "gemini" is supported
    pub provider: String,
    /// Model identifier (e.g., "gemini-1.5-flash")
    pub model: String,
    /// Per-request timeout for the API call
    pub request_timeout_secs: u64,
}

/// API keys configuration (usually loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
}

/// PDF extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages read from the start of the document
    pub max_pages: usize,
}

/// Where downloaded summaries are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from the default location (summa.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        if config.agent.provider != "gemini" {
            return Err(ConfigError::UnsupportedProvider(config.agent.provider));
        }
        Ok(config)
    }

    /// Override the API key from environment variables
    fn apply_env(&mut self) {
        if let Some(key) = env_api_key() {
            self.api.gemini_key = Some(key);
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("summa.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::home_dir()
            .map(|home| home.join(".config").join("summa").join("summa.toml"))
            .filter(|path| path.exists())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api.gemini_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.agent.request_timeout_secs)
    }
}

/// First non-blank key found in [`API_KEY_VARS`]
pub fn env_api_key() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Clamp a requested page count to `1..=MAX_PAGES_LIMIT`
pub fn clamp_max_pages(pages: usize) -> usize {
    pages.clamp(1, MAX_PAGES_LIMIT)
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_pages: 10 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
        }
    }
}
