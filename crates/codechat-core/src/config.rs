//! TOML configuration with environment overrides.
//!
//! Settings come from `config/default.toml` when present, falling back to
//! built-in defaults, then `CODECHAT_*` environment variables override
//! individual fields. The LLM API key is read exclusively from
//! `CODECHAT_LLM_API_KEY` and never from the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value}")]
    InvalidEnvVar { name: &'static str, value: String },

    #[error("CODECHAT_LLM_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub index: IndexConfig,
    pub chat: ChatConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            index: IndexConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit_bytes: 64 * 1024,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub max_tokens: u32,
    /// Populated from `CODECHAT_LLM_API_KEY` only.
    #[serde(skip)]
    pub api_key: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_tokens: 1024,
            api_key: String::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub ignore_folders: Vec<String>,
    pub ignore_files: Vec<String>,
    /// Chunks returned per retrieval.
    pub k: usize,
    /// Candidates considered by the MMR pass.
    pub fetch_k: usize,
    pub lambda: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2500,
            chunk_overlap: 200,
            ignore_folders: vec![
                ".git".to_string(),
                "__pycache__".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ],
            ignore_files: Vec::new(),
            k: 6,
            fetch_k: 20,
            lambda: 0.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// Estimated token budget for history sent with each prompt.
    pub history_budget_tokens: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_budget_tokens: 6000,
        }
    }
}

impl Config {
    /// Load from `path` when it exists, otherwise start from defaults,
    /// then apply `CODECHAT_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or
    /// parsed, or when an override variable holds an unparsable value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var("CODECHAT_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CODECHAT_SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "CODECHAT_SERVER_PORT",
                value: port,
            })?;
        }
        if let Ok(base_url) = std::env::var("CODECHAT_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Ok(model) = std::env::var("CODECHAT_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(embedding_model) = std::env::var("CODECHAT_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = embedding_model;
        }
        if let Ok(api_key) = std::env::var("CODECHAT_LLM_API_KEY") {
            self.llm.api_key = api_key;
        }
        Ok(())
    }

    /// Reject configurations the server cannot start with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when no API key was
    /// provided through the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}
