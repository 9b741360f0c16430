//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the session/resolver logic and
//! infrastructure. Implementations live in other crates.

use crate::{
    CacheKey, Credentials, DashboardSummary, DataSource, LoginGrant, Policy, SettingsRecord,
    UserIdentity,
};
use std::future::Future;

/// Persists the session token
///
/// Implemented by the infrastructure layer (policydesk-store)
pub trait TokenStore {
    /// Error type for token operations
    type Error: std::fmt::Display;

    /// Get the stored token, if any
    fn get_token(&self) -> Result<Option<String>, Self::Error>;

    /// Store a token, replacing any previous one
    fn set_token(&self, token: &str) -> Result<(), Self::Error>;

    /// Remove the stored token. Removing a missing token is not an error.
    fn remove_token(&self) -> Result<(), Self::Error>;
}

/// Keyed local persistence for cached backend data
///
/// Values are opaque text (JSON in practice). Implemented by the
/// infrastructure layer (policydesk-store)
pub trait LocalCache {
    /// Error type for cache operations
    type Error: std::fmt::Display;

    /// Read the value stored under a key
    fn read(&self, key: CacheKey) -> Result<Option<String>, Self::Error>;

    /// Store a value under a key, replacing any previous one
    fn write(&self, key: CacheKey, value: &str) -> Result<(), Self::Error>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: CacheKey) -> Result<(), Self::Error>;
}

/// Why a remote call did not produce a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// Network error, timeout, server error or unreadable response
    Transport(String),

    /// The backend answered and refused (bad credentials, validation failure)
    Rejected(String),
}

impl ApiFailure {
    /// The human-readable message
    pub fn message(&self) -> &str {
        match self {
            ApiFailure::Transport(msg) | ApiFailure::Rejected(msg) => msg,
        }
    }

    /// Whether the backend itself refused the request
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiFailure::Rejected(_))
    }
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiFailure::Transport(msg) => write!(f, "transport failure: {}", msg),
            ApiFailure::Rejected(msg) => write!(f, "rejected: {}", msg),
        }
    }
}

impl std::error::Error for ApiFailure {}

/// Typed access to the CRM backend
///
/// Implemented by the SDK's HTTP client and by test doubles
pub trait RemoteApi {
    /// Exchange credentials for a token and identity
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginGrant, ApiFailure>> + Send;

    /// Fetch the profile of the token holder
    fn get_profile(&self) -> impl Future<Output = Result<UserIdentity, ApiFailure>> + Send;

    /// End the session on the backend
    fn logout(&self) -> impl Future<Output = Result<(), ApiFailure>> + Send;

    /// List ingestion data sources
    fn get_data_sources(&self)
        -> impl Future<Output = Result<Vec<DataSource>, ApiFailure>> + Send;

    /// Fetch business settings
    fn get_settings(&self) -> impl Future<Output = Result<SettingsRecord, ApiFailure>> + Send;

    /// Replace business settings, returning the stored record
    fn update_settings(
        &self,
        settings: &SettingsRecord,
    ) -> impl Future<Output = Result<SettingsRecord, ApiFailure>> + Send;

    /// List policies
    fn get_policies(&self) -> impl Future<Output = Result<Vec<Policy>, ApiFailure>> + Send;

    /// Fetch dashboard headline figures
    fn get_dashboard(&self) -> impl Future<Output = Result<DashboardSummary, ApiFailure>> + Send;
}
