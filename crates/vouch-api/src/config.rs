//! Configuration file parsing for the API server.
//!
//! Loads settings from TOML files including bind address, database
//! path, and completion provider settings. The provider API key can
//! also come from the environment.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use vouch_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database path (default: "vouch.db"; ":memory:" keeps
    /// everything in process)
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Completion provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_provider_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_provider_model")]
    pub model: String,

    /// API key; when empty, the OPENAI_API_KEY environment variable is
    /// consulted instead
    #[serde(default)]
    pub api_key: String,
}

/// Default database path: a file next to the server
fn default_database_path() -> String {
    "vouch.db".to_string()
}

fn default_provider_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_provider_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            endpoint: default_provider_endpoint(),
            model: default_provider_model(),
            api_key: String::new(),
        }
    }
}

impl ProviderConfig {
    /// The API key from config, falling back to OPENAI_API_KEY
    ///
    /// Returns an empty string when neither source has a key; the
    /// provider then degrades instead of the server refusing to start.
    pub fn resolve_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENAI_API_KEY").unwrap_or_default()
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        // Validate required fields
        if config.database_path.is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            provider: ProviderConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
