//! In-memory token store and cache.

use crate::StoreError;
use policydesk_domain::traits::{LocalCache, TokenStore};
use policydesk_domain::CacheKey;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local implementation of `TokenStore` and `LocalCache`
///
/// Nothing survives the process. Suitable for tests and for sessions that
/// should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
    entries: RwLock<HashMap<CacheKey, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether no entries are cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenStore for MemoryStore {
    type Error = StoreError;

    fn get_token(&self) -> Result<Option<String>, Self::Error> {
        let token = self.token.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(token.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), Self::Error> {
        let mut slot = self.token.write().map_err(|_| StoreError::LockPoisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove_token(&self) -> Result<(), Self::Error> {
        let mut slot = self.token.write().map_err(|_| StoreError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}

impl LocalCache for MemoryStore {
    type Error = StoreError;

    fn read(&self, key: CacheKey) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(&key).cloned())
    }

    fn write(&self, key: CacheKey, value: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(&key);
        Ok(())
    }
}
