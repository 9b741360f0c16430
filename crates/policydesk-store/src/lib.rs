//! PolicyDesk Storage Layer
//!
//! Implements the `TokenStore` and `LocalCache` traits.
//!
//! # Architecture
//!
//! - `SqliteStore`: token and cache entries in SQLite, surviving restarts
//! - `MemoryStore`: process-local maps, for tests and ephemeral sessions
//!
//! # Examples
//!
//! ```no_run
//! use policydesk_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for token and cache operations
//! ```

#![warn(missing_docs)]

mod memory;

pub use memory::MemoryStore;

use policydesk_domain::traits::{LocalCache, TokenStore};
use policydesk_domain::CacheKey;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A previous holder of the store lock panicked
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// SQLite-based implementation of `TokenStore` and `LocalCache`
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared between the
/// session manager and the resolver. Each operation is a single statement;
/// clearing several keys is a sequence of independent removals.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use policydesk_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("policydesk.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Keys that currently hold a cached value
    pub fn cached_keys(&self) -> Result<Vec<CacheKey>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM cache_entries ORDER BY key")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        // Rows written by an unknown client version are ignored
        Ok(names.iter().filter_map(|n| CacheKey::parse(n)).collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl TokenStore for SqliteStore {
    type Error = StoreError;

    fn get_token(&self) -> Result<Option<String>, Self::Error> {
        let conn = self.lock()?;
        let token = conn
            .query_row("SELECT token FROM session_token WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(token)
    }

    fn set_token(&self, token: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO session_token (id, token, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET token = excluded.token, updated_at = excluded.updated_at",
            params![token, unix_now()],
        )?;
        Ok(())
    }

    fn remove_token(&self) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM session_token WHERE id = 1", [])?;
        Ok(())
    }
}

impl LocalCache for SqliteStore {
    type Error = StoreError;

    fn read(&self, key: CacheKey) -> Result<Option<String>, Self::Error> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: CacheKey, value: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO cache_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), value, unix_now()],
        )?;
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM cache_entries WHERE key = ?1",
            params![key.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_replace() {
        let store = SqliteStore::new(":memory:").unwrap();
        store.set_token("first").unwrap();
        store.set_token("second").unwrap();
        assert_eq!(store.get_token().unwrap(), Some("second".to_string()));
    }

    #[test]
    fn test_cached_keys_lists_written_keys() {
        let store = SqliteStore::new(":memory:").unwrap();
        store.write(CacheKey::Settings, "{}").unwrap();
        store.write(CacheKey::Policies, "[]").unwrap();

        let keys = store.cached_keys().unwrap();
        assert_eq!(keys, vec![CacheKey::Policies, CacheKey::Settings]);
    }
}
