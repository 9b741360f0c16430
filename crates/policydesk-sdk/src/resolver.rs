//! Dual-storage resolver.
//!
//! Every read goes through an ordered list of tiers: the remote backend, the
//! local cache, and finally fixed demo data. The first tier that yields a
//! value wins and the result is tagged with its source. Recoverable failures
//! never escape; they are logged and the next tier is tried.
//!
//! Identity operations (login, profile, logout) and settings writes only have
//! a remote tier. Login in particular must never succeed with demo data.

use crate::demo::CachedResource;
use policydesk_domain::traits::{LocalCache, RemoteApi};
use policydesk_domain::{
    ApiFailure, CacheKey, Credentials, DashboardSummary, DataSource, LoginGrant, Policy, Resolved,
    SettingsRecord, Source, UserIdentity,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One fallback level of the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverTier {
    /// Call the backend
    Remote,

    /// Read the last backend value from the local cache
    Cache,

    /// Serve fixed demo data
    Mock,
}

impl ResolverTier {
    /// Tier name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ResolverTier::Remote => "remote",
            ResolverTier::Cache => "cache",
            ResolverTier::Mock => "mock",
        }
    }

    /// The provenance tag of values produced by this tier
    pub fn source(&self) -> Source {
        match self {
            ResolverTier::Remote => Source::BackendApi,
            ResolverTier::Cache => Source::Cache,
            ResolverTier::Mock => Source::MockData,
        }
    }
}

/// Remote, then cache, then demo data
pub const DEFAULT_TIERS: [ResolverTier; 3] =
    [ResolverTier::Remote, ResolverTier::Cache, ResolverTier::Mock];

/// Mediates between the backend and local state
pub struct DualStorageResolver<A, C> {
    api: A,
    cache: Arc<C>,
    tiers: Vec<ResolverTier>,
}

impl<A, C> DualStorageResolver<A, C>
where
    A: RemoteApi,
    C: LocalCache,
{
    /// Create a resolver with the default tier order
    pub fn new(api: A, cache: Arc<C>) -> Self {
        Self {
            api,
            cache,
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }

    /// Replace the tier order (e.g., drop `Remote` for offline use)
    pub fn with_tiers(mut self, tiers: Vec<ResolverTier>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Active tiers, in evaluation order
    pub fn tiers(&self) -> &[ResolverTier] {
        &self.tiers
    }

    /// The backend client
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The local cache
    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn remote_enabled(&self) -> bool {
        self.tiers.contains(&ResolverTier::Remote)
    }

    /// Log in. No fallback: a refusal or outage is reported as a failure.
    pub async fn login(&self, credentials: &Credentials) -> Resolved<LoginGrant> {
        self.remote_only("login", self.api.login(credentials)).await
    }

    /// Fetch the profile of the current token holder. No fallback.
    pub async fn profile(&self) -> Resolved<UserIdentity> {
        self.remote_only("profile", self.api.get_profile()).await
    }

    /// End the session on the backend. No fallback.
    pub async fn logout(&self) -> Resolved<()> {
        self.remote_only("logout", self.api.logout()).await
    }

    /// Data sources: remote, cache (`uploads`), demo
    pub async fn data_sources(&self) -> Resolved<Vec<DataSource>> {
        self.resolve("data_sources", self.api.get_data_sources()).await
    }

    /// Business settings: remote, cache (`settings`), defaults
    pub async fn settings(&self) -> Resolved<SettingsRecord> {
        self.resolve("settings", self.api.get_settings()).await
    }

    /// Policies: remote, cache (`policies`), demo
    pub async fn policies(&self) -> Resolved<Vec<Policy>> {
        self.resolve("policies", self.api.get_policies()).await
    }

    /// Dashboard figures: remote, cache (`dashboard`), demo
    pub async fn dashboard(&self) -> Resolved<DashboardSummary> {
        self.resolve("dashboard", self.api.get_dashboard()).await
    }

    /// Push settings to the backend and cache what it stored. No fallback.
    pub async fn save_settings(&self, settings: &SettingsRecord) -> Resolved<SettingsRecord> {
        let result = self
            .remote_only("save_settings", self.api.update_settings(settings))
            .await;
        if let Some(stored) = result.data() {
            self.store(stored);
        }
        result
    }

    /// Remove every known cache key
    ///
    /// Removals are independent; a failure is logged and the remaining keys
    /// are still removed. Returns whether every removal succeeded.
    pub fn clear_cache(&self) -> bool {
        let mut all_removed = true;
        for key in CacheKey::ALL {
            if let Err(e) = self.cache.remove(key) {
                warn!(%key, error = %e, "Failed to clear cache entry");
                all_removed = false;
            }
        }
        debug!("Local cache cleared");
        all_removed
    }

    /// Evaluate the tiers in order for a cacheable read
    async fn resolve<T, F>(&self, operation: &'static str, remote: F) -> Resolved<T>
    where
        T: CachedResource,
        F: Future<Output = Result<T, ApiFailure>>,
    {
        let mut remote = Some(remote);
        let mut last_error: Option<String> = None;
        let mut last_source = Source::BackendApi;

        for tier in &self.tiers {
            last_source = tier.source();
            match tier {
                ResolverTier::Remote => {
                    let Some(call) = remote.take() else {
                        continue;
                    };
                    match call.await {
                        Ok(data) => {
                            self.store(&data);
                            return Resolved::success(data, Source::BackendApi);
                        }
                        Err(failure) => {
                            warn!(operation, error = %failure, "Remote tier failed, falling back");
                            last_error = Some(failure.message().to_string());
                        }
                    }
                }
                ResolverTier::Cache => {
                    if let Some(data) = self.load::<T>() {
                        info!(operation, "Serving cached data");
                        return Resolved::success(data, Source::Cache);
                    }
                    debug!(operation, key = %T::CACHE_KEY, "Cache miss");
                }
                ResolverTier::Mock => {
                    info!(operation, "Serving demo data");
                    return Resolved::success(T::demo(), Source::MockData);
                }
            }
        }

        let message =
            last_error.unwrap_or_else(|| format!("no resolver tier produced {}", operation));
        Resolved::failure(message, last_source)
    }

    /// Run a call that has no cache or demo equivalent
    async fn remote_only<T, F>(&self, operation: &'static str, remote: F) -> Resolved<T>
    where
        F: Future<Output = Result<T, ApiFailure>>,
    {
        if !self.remote_enabled() {
            return Resolved::failure(
                format!("{} requires the backend, which is disabled", operation),
                Source::BackendApi,
            );
        }

        match remote.await {
            Ok(data) => Resolved::success(data, Source::BackendApi),
            Err(failure) => {
                if failure.is_rejection() {
                    info!(operation, error = %failure, "Backend refused the request");
                } else {
                    warn!(operation, error = %failure, "Remote call failed");
                }
                Resolved::failure(failure.message(), Source::BackendApi)
            }
        }
    }

    /// Read and decode a cached value. Unreadable or corrupt entries are misses.
    fn load<T: CachedResource>(&self) -> Option<T> {
        let raw = match self.cache.read(T::CACHE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %T::CACHE_KEY, error = %e, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %T::CACHE_KEY, error = %e, "Discarding corrupt cache entry");
                None
            }
        }
    }

    /// Write a backend value to the cache. Advisory: failures are only logged.
    fn store<T: CachedResource>(&self, value: &T) {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %T::CACHE_KEY, error = %e, "Failed to encode value for cache");
                return;
            }
        };

        if let Err(e) = self.cache.write(T::CACHE_KEY, &encoded) {
            warn!(key = %T::CACHE_KEY, error = %e, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use policydesk_domain::Role;
    use policydesk_store::MemoryStore;

    fn resolver(api: &MockApi) -> (DualStorageResolver<MockApi, MemoryStore>, Arc<MemoryStore>) {
        let cache = Arc::new(MemoryStore::new());
        (DualStorageResolver::new(api.clone(), Arc::clone(&cache)), cache)
    }

    fn cached_settings() -> SettingsRecord {
        SettingsRecord {
            brokerage_percent: "12".to_string(),
            rep_daily_cost: "1800".to_string(),
            expected_conversion: "30".to_string(),
            premium_growth: "8".to_string(),
        }
    }

    #[tokio::test]
    async fn test_remote_success_is_tagged_and_cached() {
        let api = MockApi::new();
        let remote = cached_settings();
        api.set_settings(Ok(remote.clone()));
        let (resolver, cache) = resolver(&api);

        let result = resolver.settings().await;

        assert!(result.is_success());
        assert_eq!(result.source(), Source::BackendApi);
        assert_eq!(result.data(), Some(&remote));

        let raw = cache.read(CacheKey::Settings).unwrap().unwrap();
        let stored: SettingsRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, remote);
    }

    #[tokio::test]
    async fn test_remote_failure_serves_cache() {
        let api = MockApi::new();
        api.set_settings(Err(ApiFailure::Transport("connection refused".to_string())));
        let (resolver, cache) = resolver(&api);
        cache
            .write(
                CacheKey::Settings,
                &serde_json::to_string(&cached_settings()).unwrap(),
            )
            .unwrap();

        let result = resolver.settings().await;

        assert!(result.is_success());
        assert_eq!(result.source(), Source::Cache);
        assert_eq!(result.data().unwrap().brokerage_percent, "12");
    }

    #[tokio::test]
    async fn test_remote_failure_without_cache_serves_demo() {
        let api = MockApi::new();
        api.set_policies(Err(ApiFailure::Rejected("unauthorized".to_string())));
        let (resolver, _cache) = resolver(&api);

        let result = resolver.policies().await;

        assert!(result.is_success());
        assert_eq!(result.source(), Source::MockData);
        assert_eq!(result.into_data().unwrap(), <Vec<Policy>>::demo());
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_through_to_demo() {
        let api = MockApi::new();
        let (resolver, cache) = resolver(&api);
        cache.write(CacheKey::Dashboard, "{not json").unwrap();

        let result = resolver.dashboard().await;

        assert_eq!(result.source(), Source::MockData);
        assert_eq!(result.into_data().unwrap(), DashboardSummary::demo());
    }

    #[tokio::test]
    async fn test_data_sources_use_uploads_key() {
        let api = MockApi::new();
        let sources = vec![DataSource {
            id: "up-1".to_string(),
            name: "March batch".to_string(),
            kind: "pdf_upload".to_string(),
            record_count: 42,
            last_synced: None,
        }];
        api.set_data_sources(Ok(sources.clone()));
        let (resolver, cache) = resolver(&api);

        let result = resolver.data_sources().await;
        assert_eq!(result.source(), Source::BackendApi);
        assert!(cache.read(CacheKey::Uploads).unwrap().is_some());

        // Backend goes away; the cached copy is served
        api.set_data_sources(Err(ApiFailure::Transport("timeout".to_string())));
        let result = resolver.data_sources().await;
        assert_eq!(result.source(), Source::Cache);
        assert_eq!(result.into_data().unwrap(), sources);
    }

    #[tokio::test]
    async fn test_login_rejection_does_not_fall_back() {
        let api = MockApi::new();
        api.set_login(Err(ApiFailure::Rejected("invalid credentials".to_string())));
        let (resolver, _cache) = resolver(&api);

        let result = resolver.login(&Credentials::new("x", "y")).await;

        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert_eq!(result.error(), Some("invalid credentials"));
        assert_eq!(result.source(), Source::BackendApi);
    }

    #[tokio::test]
    async fn test_login_transport_failure_does_not_fall_back() {
        let api = MockApi::new();
        api.set_login(Err(ApiFailure::Transport("connection refused".to_string())));
        let (resolver, _cache) = resolver(&api);

        let result = resolver.login(&Credentials::new("x", "y")).await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_offline_tiers_skip_remote() {
        let api = MockApi::new();
        api.set_settings(Ok(cached_settings()));
        let cache = Arc::new(MemoryStore::new());
        let resolver = DualStorageResolver::new(api.clone(), cache)
            .with_tiers(vec![ResolverTier::Cache, ResolverTier::Mock]);

        let result = resolver.settings().await;

        assert_eq!(result.source(), Source::MockData);
        assert_eq!(api.call_count("get_settings"), 0);

        let login = resolver.login(&Credentials::new("a@b.com", "pw")).await;
        assert!(!login.is_success());
        assert_eq!(api.call_count("login"), 0);
    }

    #[tokio::test]
    async fn test_exhausted_tiers_report_failure() {
        let api = MockApi::new();
        api.set_settings(Err(ApiFailure::Transport("down".to_string())));
        let cache = Arc::new(MemoryStore::new());
        let resolver = DualStorageResolver::new(api, cache)
            .with_tiers(vec![ResolverTier::Remote, ResolverTier::Cache]);

        let result = resolver.settings().await;

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("down"));
        assert_eq!(result.source(), Source::Cache);
    }

    #[tokio::test]
    async fn test_save_settings_updates_cache() {
        let api = MockApi::new();
        let (resolver, cache) = resolver(&api);

        let result = resolver.save_settings(&cached_settings()).await;

        assert!(result.is_success());
        let raw = cache.read(CacheKey::Settings).unwrap().unwrap();
        assert!(raw.contains("\"brokeragePercent\":\"12\""));
    }

    #[tokio::test]
    async fn test_profile_has_no_fallback() {
        let api = MockApi::new();
        let (resolver, _cache) = resolver(&api);

        let result = resolver.profile().await;
        assert!(!result.is_success());

        api.set_profile(Ok(UserIdentity {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            role: Role::Founder,
        }));
        let result = resolver.profile().await;
        assert_eq!(result.data().map(|u| u.role), Some(Role::Founder));
    }

    #[test]
    fn test_clear_cache_removes_all_keys() {
        let api = MockApi::new();
        let (resolver, cache) = resolver(&api);
        for key in CacheKey::ALL {
            cache.write(key, "[]").unwrap();
        }

        assert!(resolver.clear_cache());
        assert!(cache.is_empty());
        // Idempotent
        assert!(resolver.clear_cache());
    }
}
