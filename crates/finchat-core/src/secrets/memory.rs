//! In-memory secret store for testing

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreResult};

/// Secret store backed by an in-memory map.
///
/// Nothing is persisted; the store is dropped with the process. Intended for
/// tests and for wiring a fixed key through the provider auth resolver.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one secret
    pub fn with_secret(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.secrets.write().insert(key.into(), value.into());
        store
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets.read().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        self.secrets.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySecretStore::new();
        assert_eq!(store.get("anthropic"), None);

        store.store("anthropic", "sk-ant-123").unwrap();
        assert_eq!(store.get("anthropic"), Some("sk-ant-123".to_string()));
        assert!(store.has("anthropic"));
    }

    #[test]
    fn test_with_secret() {
        let store = MemorySecretStore::with_secret("openai", "sk-123");
        assert_eq!(store.get("openai"), Some("sk-123".to_string()));
    }
}
