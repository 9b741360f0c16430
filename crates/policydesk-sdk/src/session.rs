//! Session manager: current-user state and the login/logout/refresh flows.
//!
//! The manager is the single owner of the signed-in identity. Components read
//! it through accessors or subscribe to change notifications; nothing else
//! mutates it. Mutations are not serialized: two overlapping logins both run
//! to completion and the last one to set the user wins.

use crate::listeners::{ListenerRegistry, Subscription};
use crate::resolver::DualStorageResolver;
use crate::token::{self, TokenStatus};
use policydesk_domain::traits::{LocalCache, RemoteApi, TokenStore};
use policydesk_domain::{Credentials, SessionState, UserIdentity};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default delay between a successful login and its forced refresh
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// What listeners receive on every forced refresh
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The current identity; a fresh allocation on every refresh
    pub user: Option<Arc<UserIdentity>>,

    /// Incremented on every change or forced refresh
    pub revision: u64,
}

impl SessionSnapshot {
    /// True exactly when a user is present
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Debug, Default)]
struct SessionCell {
    initialized: bool,
    user: Option<Arc<UserIdentity>>,
    revision: u64,
    last_error: Option<String>,
}

/// State shared with the delayed refresh task
struct SessionShared {
    cell: RwLock<SessionCell>,
    listeners: ListenerRegistry<SessionSnapshot>,
}

impl SessionShared {
    fn new() -> Self {
        Self {
            cell: RwLock::new(SessionCell::default()),
            listeners: ListenerRegistry::new(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let cell = self.cell.read().unwrap_or_else(PoisonError::into_inner);
        SessionSnapshot {
            user: cell.user.clone(),
            revision: cell.revision,
        }
    }

    fn with_cell<R>(&self, f: impl FnOnce(&mut SessionCell) -> R) -> R {
        let mut cell = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut cell)
    }

    fn replace_user(&self, user: Option<UserIdentity>) {
        self.with_cell(|cell| {
            cell.initialized = true;
            cell.user = user.map(Arc::new);
            cell.revision += 1;
        });
    }

    fn set_last_error(&self, message: Option<String>) {
        self.with_cell(|cell| cell.last_error = message);
    }

    /// Record a failed login. The session is settled as unauthenticated
    /// unless a user is already signed in.
    fn login_failed(&self, message: String) {
        self.with_cell(|cell| {
            cell.initialized = true;
            cell.last_error = Some(message);
        });
    }

    /// Swap in an equal but newly allocated identity and notify listeners
    fn force_update(&self) -> SessionSnapshot {
        let snapshot = self.with_cell(|cell| {
            cell.user = cell.user.as_deref().map(|user| Arc::new(user.clone()));
            cell.revision += 1;
            SessionSnapshot {
                user: cell.user.clone(),
                revision: cell.revision,
            }
        });

        let notified = self.listeners.publish(&snapshot);
        debug!(revision = snapshot.revision, notified, "Forced session refresh");
        snapshot
    }
}

/// Owns the signed-in identity and drives session transitions
///
/// # Examples
///
/// ```no_run
/// use policydesk_domain::Credentials;
/// use policydesk_sdk::{DualStorageResolver, MockApi, SessionManager};
/// use policydesk_store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn run() {
/// let store = Arc::new(MemoryStore::new());
/// let resolver = Arc::new(DualStorageResolver::new(MockApi::new(), Arc::clone(&store)));
/// let session = SessionManager::new(resolver, store);
///
/// session.initialize().await;
/// if session.login(&Credentials::new("ops@example.com", "secret")).await {
///     println!("signed in as {:?}", session.user());
/// }
/// # }
/// ```
pub struct SessionManager<A, C, T> {
    resolver: Arc<DualStorageResolver<A, C>>,
    tokens: Arc<T>,
    shared: Arc<SessionShared>,
    settle_delay: Duration,
}

impl<A, C, T> SessionManager<A, C, T>
where
    A: RemoteApi,
    C: LocalCache,
    T: TokenStore,
{
    /// Create a manager in the `Initializing` state
    pub fn new(resolver: Arc<DualStorageResolver<A, C>>, tokens: Arc<T>) -> Self {
        Self {
            resolver,
            tokens,
            shared: Arc::new(SessionShared::new()),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
        }
    }

    /// Set the delay before the forced refresh that follows a login
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Restore the session from a stored token
    ///
    /// With a token, the profile is fetched: success authenticates, failure
    /// discards the token and the cache. An expired JWT is discarded without
    /// asking the backend. Without a token the session is unauthenticated.
    pub async fn initialize(&self) -> SessionState {
        let stored = match self.tokens.get_token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read stored token");
                None
            }
        };

        match stored {
            None => {
                debug!("No stored token");
                self.shared.replace_user(None);
            }
            Some(stored_token) if token::inspect(&stored_token) == TokenStatus::Expired => {
                info!("Stored token has expired, discarding it");
                self.end_local_session();
            }
            Some(_) => match self.resolver.profile().await.into_result() {
                Ok((user, _)) => {
                    info!(user_id = %user.id, role = user.role.as_str(), "Session restored");
                    self.shared.replace_user(Some(user));
                }
                Err((message, _)) => {
                    warn!(error = %message, "Stored token rejected, discarding it");
                    self.end_local_session();
                }
            },
        }

        self.shared.force_update();
        self.state()
    }

    /// Log in with email and password
    ///
    /// Clears the local cache first so no data from a previous user survives.
    /// On success stores the token, sets the user and schedules a forced
    /// refresh after the settle delay. Returns whether the login succeeded;
    /// failures are logged and their message kept in [`Self::last_error`].
    pub async fn login(&self, credentials: &Credentials) -> bool {
        self.resolver.clear_cache();

        let grant = match self.resolver.login(credentials).await.into_result() {
            Ok((grant, _)) => grant,
            Err((message, _)) => {
                warn!(error = %message, "Login failed");
                self.shared.login_failed(message);
                return false;
            }
        };

        if let Err(e) = self.tokens.set_token(&grant.token) {
            error!(error = %e, "Login succeeded but the token could not be stored");
            self.shared.login_failed(format!("Could not store session token: {}", e));
            return false;
        }

        info!(user_id = %grant.user.id, role = grant.user.role.as_str(), "Login succeeded");
        self.shared.replace_user(Some(grant.user));
        self.shared.set_last_error(None);
        self.schedule_refresh();
        true
    }

    /// Log out
    ///
    /// The backend call is best effort. Whatever it returns, the user, the
    /// cache and the token are cleared and listeners are notified.
    pub async fn logout(&self) {
        let remote = self.resolver.logout().await;
        if let Some(message) = remote.error() {
            warn!(error = %message, "Remote logout failed, clearing local session anyway");
        }

        self.end_local_session();
        self.shared.force_update();
        info!("Logged out");
    }

    /// Re-fetch the profile, logging out if it cannot be read
    pub async fn refresh_user(&self) {
        self.resolver.clear_cache();

        match self.resolver.profile().await.into_result() {
            Ok((user, _)) => {
                debug!(user_id = %user.id, "Profile refreshed");
                self.shared.replace_user(Some(user));
                self.shared.force_update();
            }
            Err((message, _)) => {
                warn!(error = %message, "Profile refresh failed, ending session");
                self.logout().await;
            }
        }
    }

    /// Replace the identity with an equal copy and notify listeners now
    pub fn force_user_update(&self) -> SessionSnapshot {
        self.shared.force_update()
    }

    /// Register a listener for forced refreshes
    ///
    /// Listeners run synchronously, in registration order.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(listener)
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        let cell = self.shared.cell.read().unwrap_or_else(PoisonError::into_inner);
        match (&cell.user, cell.initialized) {
            (Some(user), _) => SessionState::Authenticated(UserIdentity::clone(user)),
            (None, false) => SessionState::Initializing,
            (None, true) => SessionState::Unauthenticated,
        }
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<UserIdentity> {
        self.shared.snapshot().user.map(|user| UserIdentity::clone(&user))
    }

    /// True exactly when a user is present
    pub fn is_authenticated(&self) -> bool {
        self.shared.snapshot().is_authenticated()
    }

    /// Incremented on every user change or forced refresh
    pub fn revision(&self) -> u64 {
        self.shared.snapshot().revision
    }

    /// Current identity and revision
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshot()
    }

    /// Message of the most recent failed login, cleared by a successful one
    pub fn last_error(&self) -> Option<String> {
        let cell = self.shared.cell.read().unwrap_or_else(PoisonError::into_inner);
        cell.last_error.clone()
    }

    /// The resolver this manager drives
    pub fn resolver(&self) -> &Arc<DualStorageResolver<A, C>> {
        &self.resolver
    }

    /// Clear user, cache and token. Each step runs even if an earlier one fails.
    fn end_local_session(&self) {
        self.shared.replace_user(None);
        self.resolver.clear_cache();
        if let Err(e) = self.tokens.remove_token() {
            warn!(error = %e, "Failed to remove stored token");
        }
    }

    /// Run a forced refresh once dependent state has settled
    fn schedule_refresh(&self) {
        let shared = Arc::clone(&self.shared);
        let delay = self.settle_delay;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    shared.force_update();
                });
            }
            Err(_) => {
                debug!("No async runtime, refreshing immediately");
                shared.force_update();
            }
        }
    }
}
