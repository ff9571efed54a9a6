use std::collections::HashMap;

use async_trait::async_trait;

use super::errors::StorageError;
use super::types::CredentialStore;

/// Ephemeral credential store for tests and sessions that should not outlive
/// the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entry: HashMap<String, String>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory credential store");
        Self {
            entry: HashMap::new(),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry.get(key).cloned())
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entry.remove(key);
        Ok(())
    }
}
