//! Scriptable backend double.

use policydesk_domain::traits::RemoteApi;
use policydesk_domain::{
    ApiFailure, Credentials, DashboardSummary, DataSource, LoginGrant, Policy, SettingsRecord,
    UserIdentity,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type Reply<T> = Result<T, ApiFailure>;

/// Mock backend for deterministic testing
///
/// Returns pre-configured replies without making any network calls. An
/// operation with no configured reply fails with a transport error, except
/// `update_settings`, which echoes its input like a real backend would.
/// Clones share state, so a test can keep a handle after passing one to a
/// resolver.
///
/// # Examples
///
/// ```
/// use policydesk_sdk::MockApi;
/// use policydesk_domain::{ApiFailure, SettingsRecord};
///
/// let api = MockApi::new();
/// api.set_settings(Ok(SettingsRecord::default()));
/// api.set_login(Err(ApiFailure::Rejected("invalid credentials".to_string())));
/// assert_eq!(api.call_count("login"), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    login: Option<Reply<LoginGrant>>,
    queued_logins: VecDeque<(Reply<LoginGrant>, Duration)>,
    profile: Option<Reply<UserIdentity>>,
    logout: Option<Reply<()>>,
    data_sources: Option<Reply<Vec<DataSource>>>,
    settings: Option<Reply<SettingsRecord>>,
    queued_settings: VecDeque<(Reply<SettingsRecord>, Duration)>,
    update_settings: Option<Reply<SettingsRecord>>,
    policies: Option<Reply<Vec<Policy>>>,
    dashboard: Option<Reply<DashboardSummary>>,
    calls: HashMap<&'static str, usize>,
}

fn unconfigured<T>(operation: &str) -> Reply<T> {
    Err(ApiFailure::Transport(format!(
        "mock: no reply configured for {}",
        operation
    )))
}

fn reply<T: Clone>(slot: &Option<Reply<T>>, operation: &str) -> Reply<T> {
    slot.clone().unwrap_or_else(|| unconfigured(operation))
}

impl MockApi {
    /// Create a mock with no replies configured
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, operation: &'static str) -> MutexGuard<'_, MockState> {
        let mut state = self.lock();
        *state.calls.entry(operation).or_insert(0) += 1;
        state
    }

    /// Number of calls made to an operation (e.g., "login", "get_settings")
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock().calls.get(operation).copied().unwrap_or(0)
    }

    /// Reply for every login not served from the queue
    pub fn set_login(&self, reply: Reply<LoginGrant>) {
        self.lock().login = Some(reply);
    }

    /// Queue a one-shot login reply delivered after `delay`
    ///
    /// Queued replies are consumed in order before falling back to
    /// `set_login`. Useful for racing concurrent logins.
    pub fn queue_login(&self, reply: Reply<LoginGrant>, delay: Duration) {
        self.lock().queued_logins.push_back((reply, delay));
    }

    /// Reply for profile fetches
    pub fn set_profile(&self, reply: Reply<UserIdentity>) {
        self.lock().profile = Some(reply);
    }

    /// Reply for logout calls
    pub fn set_logout(&self, reply: Reply<()>) {
        self.lock().logout = Some(reply);
    }

    /// Reply for data source listings
    pub fn set_data_sources(&self, reply: Reply<Vec<DataSource>>) {
        self.lock().data_sources = Some(reply);
    }

    /// Reply for settings fetches
    pub fn set_settings(&self, reply: Reply<SettingsRecord>) {
        self.lock().settings = Some(reply);
    }

    /// Queue a one-shot settings reply delivered after `delay`
    ///
    /// Consumed in order before falling back to `set_settings`.
    pub fn queue_settings(&self, reply: Reply<SettingsRecord>, delay: Duration) {
        self.lock().queued_settings.push_back((reply, delay));
    }

    /// Reply for settings updates, instead of echoing the input
    pub fn set_update_settings(&self, reply: Reply<SettingsRecord>) {
        self.lock().update_settings = Some(reply);
    }

    /// Reply for policy listings
    pub fn set_policies(&self, reply: Reply<Vec<Policy>>) {
        self.lock().policies = Some(reply);
    }

    /// Reply for dashboard fetches
    pub fn set_dashboard(&self, reply: Reply<DashboardSummary>) {
        self.lock().dashboard = Some(reply);
    }
}

impl RemoteApi for MockApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginGrant, ApiFailure> {
        let (result, delay) = {
            let mut state = self.record("login");
            match state.queued_logins.pop_front() {
                Some((result, delay)) => (result, delay),
                None => (reply(&state.login, "login"), Duration::ZERO),
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_profile(&self) -> Result<UserIdentity, ApiFailure> {
        let state = self.record("get_profile");
        reply(&state.profile, "get_profile")
    }

    async fn logout(&self) -> Result<(), ApiFailure> {
        let state = self.record("logout");
        reply(&state.logout, "logout")
    }

    async fn get_data_sources(&self) -> Result<Vec<DataSource>, ApiFailure> {
        let state = self.record("get_data_sources");
        reply(&state.data_sources, "get_data_sources")
    }

    async fn get_settings(&self) -> Result<SettingsRecord, ApiFailure> {
        let (result, delay) = {
            let mut state = self.record("get_settings");
            match state.queued_settings.pop_front() {
                Some(queued) => queued,
                None => (reply(&state.settings, "get_settings"), Duration::ZERO),
            }
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn update_settings(
        &self,
        settings: &SettingsRecord,
    ) -> Result<SettingsRecord, ApiFailure> {
        let state = self.record("update_settings");
        state
            .update_settings
            .clone()
            .unwrap_or_else(|| Ok(settings.clone()))
    }

    async fn get_policies(&self) -> Result<Vec<Policy>, ApiFailure> {
        let state = self.record("get_policies");
        reply(&state.policies, "get_policies")
    }

    async fn get_dashboard(&self) -> Result<DashboardSummary, ApiFailure> {
        let state = self.record("get_dashboard");
        reply(&state.dashboard, "get_dashboard")
    }
}
