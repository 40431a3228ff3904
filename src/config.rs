//! TOML configuration for providers, models, and token limits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found at path: {0}")]
    NotFound(PathBuf),

    #[error("Error parsing the configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where extracted page text is stored
    pub data_dir: PathBuf,
    /// Provider connection settings
    pub provider: ProviderConfig,
    /// Model identifiers
    pub models: ModelConfig,
    /// Token limits for chunking and prompt assembly
    pub limits: LimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL for the OpenAI-compatible API
    pub base_url: String,
    /// API key sent as a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model used for answer generation
    pub chat: String,
    /// Model used for embeddings, at ingestion and at query time
    pub embedding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum tokens per chunk, under the embedding model's vocabulary
    pub chunk_size_tokens: usize,
    /// Maximum tokens for the assembled prompt, under the chat model's vocabulary
    pub token_budget: usize,
    /// Number of top-ranked chunks a query retrieves
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            provider: ProviderConfig::default(),
            models: ModelConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat: "gpt-4o-mini".to_string(),
            embedding: "text-embedding-3-small".to_string(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            chunk_size_tokens: 1000,
            token_budget: 4096,
            top_n: 5,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject limit values that cannot produce a working pipeline.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.chunk_size_tokens == 0 {
            return Err(ConfigError::Invalid(
                "limits.chunk_size_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
