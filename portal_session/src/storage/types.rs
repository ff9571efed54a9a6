use async_trait::async_trait;

use super::errors::StorageError;

/// Key-value store holding persisted session credentials.
///
/// The analog of origin-scoped browser storage: a handful of string keys that
/// survive application restarts. The session manager is the sole intended
/// writer; nothing in this crate guards against other writers.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Get a value from the store.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Put a value into the store, overwriting any existing one.
    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value from the store. Removing an absent key is not an error.
    async fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
