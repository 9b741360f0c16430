//! Integration tests for policydesk-store
//!
//! These tests verify token and cache behavior for both store implementations.

use policydesk_domain::traits::{LocalCache, TokenStore};
use policydesk_domain::CacheKey;
use policydesk_store::{MemoryStore, SqliteStore};

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_token_lifecycle() {
    let store = SqliteStore::new(":memory:").unwrap();

    assert_eq!(store.get_token().unwrap(), None);

    store.set_token("eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();
    assert_eq!(
        store.get_token().unwrap().as_deref(),
        Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")
    );

    store.remove_token().unwrap();
    assert_eq!(store.get_token().unwrap(), None);
}

#[test]
fn test_remove_missing_token_is_not_an_error() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert!(store.remove_token().is_ok());
    assert!(store.remove_token().is_ok());
}

#[test]
fn test_cache_write_then_read_returns_exact_value() {
    let store = SqliteStore::new(":memory:").unwrap();
    let value = r#"{"brokeragePercent":"12","repDailyCost":"1800","expectedConversion":"30","premiumGrowth":"8"}"#;

    store.write(CacheKey::Settings, value).unwrap();
    assert_eq!(store.read(CacheKey::Settings).unwrap().as_deref(), Some(value));

    // Other keys are untouched
    assert_eq!(store.read(CacheKey::Policies).unwrap(), None);
}

#[test]
fn test_cache_overwrite_replaces_value() {
    let store = SqliteStore::new(":memory:").unwrap();

    store.write(CacheKey::Uploads, "[1]").unwrap();
    store.write(CacheKey::Uploads, "[1,2]").unwrap();

    assert_eq!(store.read(CacheKey::Uploads).unwrap().as_deref(), Some("[1,2]"));
}

#[test]
fn test_cache_remove_is_idempotent() {
    let store = SqliteStore::new(":memory:").unwrap();

    store.write(CacheKey::Dashboard, "{}").unwrap();
    store.remove(CacheKey::Dashboard).unwrap();
    store.remove(CacheKey::Dashboard).unwrap();
    store.remove(CacheKey::Policies).unwrap();

    assert_eq!(store.read(CacheKey::Dashboard).unwrap(), None);
}

#[test]
fn test_clearing_all_keys_leaves_token() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.set_token("tok").unwrap();
    for key in CacheKey::ALL {
        store.write(key, "{}").unwrap();
    }

    for key in CacheKey::ALL {
        store.remove(key).unwrap();
    }

    assert!(store.cached_keys().unwrap().is_empty());
    assert_eq!(store.get_token().unwrap().as_deref(), Some("tok"));
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policydesk.db");

    {
        let store = SqliteStore::new(&path).unwrap();
        store.set_token("persisted-token").unwrap();
        store.write(CacheKey::Policies, "[]").unwrap();
    }

    let reopened = SqliteStore::new(&path).unwrap();
    assert_eq!(
        reopened.get_token().unwrap().as_deref(),
        Some("persisted-token")
    );
    assert_eq!(reopened.read(CacheKey::Policies).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_memory_store_matches_sqlite_semantics() {
    let memory = MemoryStore::new();
    let sqlite = SqliteStore::new(":memory:").unwrap();

    memory.write(CacheKey::Settings, "x").unwrap();
    sqlite.write(CacheKey::Settings, "x").unwrap();
    memory.remove(CacheKey::Uploads).unwrap();
    sqlite.remove(CacheKey::Uploads).unwrap();

    for key in CacheKey::ALL {
        assert_eq!(memory.read(key).unwrap(), sqlite.read(key).unwrap());
    }
}
