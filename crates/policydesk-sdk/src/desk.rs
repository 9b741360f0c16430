//! Ready-wired client: store, HTTP client, resolver, session and settings.

use crate::client::HttpApiClient;
use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::logging;
use crate::resolver::{DualStorageResolver, ResolverTier};
use crate::session::SessionManager;
use crate::settings::SettingsContext;
use policydesk_domain::SessionState;
use policydesk_store::SqliteStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Backend client used by [`PolicyDesk`]
pub type DeskApi = HttpApiClient<SqliteStore>;

/// The full client core, built from a [`ClientConfig`]
///
/// One `SqliteStore` serves as token store and local cache for every
/// component, so a logout seen by the session manager is seen by the
/// resolver and the HTTP client too.
pub struct PolicyDesk {
    config: ClientConfig,
    store: Arc<SqliteStore>,
    resolver: Arc<DualStorageResolver<DeskApi, SqliteStore>>,
    session: SessionManager<DeskApi, SqliteStore, SqliteStore>,
    settings: SettingsContext<DeskApi, SqliteStore>,
}

impl PolicyDesk {
    /// Wire every component from configuration
    pub fn from_config(config: ClientConfig) -> Result<Self, SdkError> {
        config.validate()?;

        let store = Arc::new(match &config.cache_path {
            Some(path) => SqliteStore::new(path)?,
            None => SqliteStore::new(Path::new(":memory:"))?,
        });

        let api = HttpApiClient::with_timeout(
            &config.api_base_url,
            Arc::clone(&store),
            config.request_timeout(),
        )?;

        let mut resolver = DualStorageResolver::new(api, Arc::clone(&store));
        if config.offline {
            resolver = resolver.with_tiers(vec![ResolverTier::Cache, ResolverTier::Mock]);
        }
        let resolver = Arc::new(resolver);

        let session = SessionManager::new(Arc::clone(&resolver), Arc::clone(&store))
            .with_settle_delay(config.settle_delay());
        let settings = SettingsContext::new(Arc::clone(&resolver));

        info!(
            api = %config.api_base_url,
            offline = config.offline,
            persistent = config.cache_path.is_some(),
            "PolicyDesk client ready"
        );

        Ok(Self {
            config,
            store,
            resolver,
            session,
            settings,
        })
    }

    /// Restore the session, then mount the settings
    pub async fn start(&self) -> SessionState {
        let state = self.session.initialize().await;
        self.settings.mount().await;
        state
    }

    /// Install the global tracing subscriber using the configured filter
    ///
    /// `RUST_LOG` still overrides `log_filter`. Returns `false` if a
    /// subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        logging::init_tracing(&self.config.log_filter)
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared token store and cache
    pub fn store(&self) -> &Arc<SqliteStore> {
        &self.store
    }

    /// The dual-storage resolver
    pub fn resolver(&self) -> &Arc<DualStorageResolver<DeskApi, SqliteStore>> {
        &self.resolver
    }

    /// The session manager
    pub fn session(&self) -> &SessionManager<DeskApi, SqliteStore, SqliteStore> {
        &self.session
    }

    /// The settings context
    pub fn settings(&self) -> &SettingsContext<DeskApi, SqliteStore> {
        &self.settings
    }
}
