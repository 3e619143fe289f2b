//! Configuration
//!
//! Settings come from an optional YAML file (`finchat.yaml`, or the path in
//! `FINCHAT_CONFIG`) with environment-variable overrides on top. The model
//! API key is NOT configuration - it lives in the secret store only.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How to reach the registry process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegistryEndpoint {
    /// Spawn the registry as a stdio child process
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Connect to a running registry over streamable HTTP
    Http { url: String },
}

impl Default for RegistryEndpoint {
    fn default() -> Self {
        // The registry server is launched the same way its own tooling runs
        // it: `uv run --with mcp[cli] mcp run <server script>`.
        RegistryEndpoint::Stdio {
            command: "uv".to_string(),
            args: ["run", "--with", "mcp[cli]", "mcp", "run", "main.py"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Application settings shared by the CLI and the web surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the registry lives
    pub registry: RegistryEndpoint,
    /// Model identifier, optionally provider-prefixed
    pub model: String,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum model/tool rounds per conversation turn
    pub max_rounds: usize,
    /// Bind address for the web surface
    pub web_bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: RegistryEndpoint::default(),
            model: "anthropic/claude-sonnet-4-5".to_string(),
            temperature: Some(0.0),
            max_rounds: 10,
            web_bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Settings {
    /// Load settings: config file (if present) plus env overrides
    pub fn load() -> ConfigResult<Self> {
        let path = env::var("FINCHAT_CONFIG").unwrap_or_else(|_| "finchat.yaml".to_string());

        let mut settings = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Apply `FINCHAT_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("FINCHAT_REGISTRY_URL") {
            if !url.is_empty() {
                self.registry = RegistryEndpoint::Http { url };
            }
        } else if let Ok(cmd) = env::var("FINCHAT_REGISTRY_CMD") {
            let mut parts = cmd.split_whitespace().map(str::to_string);
            if let Some(command) = parts.next() {
                self.registry = RegistryEndpoint::Stdio {
                    command,
                    args: parts.collect(),
                };
            }
        }

        if let Ok(model) = env::var("FINCHAT_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }

        if let Ok(rounds) = env::var("FINCHAT_MAX_ROUNDS") {
            if let Ok(rounds) = rounds.parse() {
                self.max_rounds = rounds;
            }
        }

        if let Ok(bind) = env::var("FINCHAT_WEB_BIND") {
            if !bind.is_empty() {
                self.web_bind = bind;
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.model.is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
