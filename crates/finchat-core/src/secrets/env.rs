//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Mapping from provider names to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("anthropic", vec!["ANTHROPIC_API_KEY"]);
    m.insert("openai", vec!["OPENAI_API_KEY"]);
    m.insert("gemini", vec!["GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    m.insert("groq", vec!["GROQ_API_KEY"]);
    m.insert("ollama", vec![]); // Ollama doesn't need an API key
    m
});

/// Secret store that reads from environment variables
///
/// This store is read-only - it can only read environment variables, not set
/// them. Use this for accessing API keys set in the shell or in `.env` files
/// loaded by dotenvy.
///
/// # Example
///
/// ```
/// use finchat_core::secrets::{SecretStore, EnvSecretStore};
///
/// let store = EnvSecretStore::new();
///
/// // These are equivalent if ANTHROPIC_API_KEY is set:
/// let key1 = store.get("anthropic");
/// let key2 = store.get("ANTHROPIC_API_KEY");
/// ```
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (), // Prevent direct construction, use new()
}

impl EnvSecretStore {
    /// Create a new environment variable secret store
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        // First, try the key as-is (for direct env var access)
        if let Ok(value) = env::var(key) {
            if !value.is_empty() {
                return Some(value);
            }
        }

        // Then, try mapping from provider name to env var
        let lower_key = key.to_lowercase();
        if let Some(env_vars) = ENV_VAR_MAP.get(lower_key.as_str()) {
            for env_var in env_vars {
                if let Ok(value) = env::var(env_var) {
                    if !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }

        // Finally, try the uppercase version with _API_KEY suffix
        let auto_key = format!("{}_API_KEY", key.to_uppercase());
        if let Ok(value) = env::var(&auto_key) {
            if !value.is_empty() {
                return Some(value);
            }
        }

        None
    }

    fn store(&self, _key: &str, _value: &str) -> SecretStoreResult<()> {
        Err(SecretStoreError::ReadOnly)
    }
}
