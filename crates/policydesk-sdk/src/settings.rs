//! Settings context: business settings loaded through the resolver.

use crate::resolver::DualStorageResolver;
use policydesk_domain::traits::{LocalCache, RemoteApi};
use policydesk_domain::{SettingsRecord, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// What the settings screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsView {
    /// Current record; the hardcoded defaults until a fetch succeeds
    pub settings: SettingsRecord,

    /// Tier of the last successful fetch, `None` before the first
    pub source: Option<Source>,

    /// Message of the last failed fetch or save
    pub error: Option<String>,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            settings: SettingsRecord::default(),
            source: None,
            error: None,
        }
    }
}

/// Holds the business settings for the rest of the client
///
/// Concurrent refreshes are not de-duplicated; each one replaces the record
/// when it completes, so the last to finish wins.
pub struct SettingsContext<A, C> {
    resolver: Arc<DualStorageResolver<A, C>>,
    view: RwLock<SettingsView>,
    mounted: AtomicBool,
}

impl<A, C> SettingsContext<A, C>
where
    A: RemoteApi,
    C: LocalCache,
{
    /// Create a context holding the default settings
    pub fn new(resolver: Arc<DualStorageResolver<A, C>>) -> Self {
        Self {
            resolver,
            view: RwLock::new(SettingsView::default()),
            mounted: AtomicBool::new(false),
        }
    }

    /// Fetch settings the first time this is called; later calls do nothing
    ///
    /// Returns whether a fetch ran.
    pub async fn mount(&self) -> bool {
        if self.mounted.swap(true, Ordering::SeqCst) {
            debug!("Settings already mounted");
            return false;
        }
        self.refresh_settings().await;
        true
    }

    /// Fetch settings again
    ///
    /// A successful result replaces the whole record. A failed result keeps
    /// the previous record and sets the error message. Returns whether the
    /// fetch succeeded.
    pub async fn refresh_settings(&self) -> bool {
        let result = self.resolver.settings().await;

        match result.into_result() {
            Ok((settings, source)) => {
                if source.is_fallback() {
                    info!(%source, "Settings served without the backend");
                }
                self.update(|view| {
                    view.settings = settings;
                    view.source = Some(source);
                    view.error = None;
                });
                true
            }
            Err((message, _)) => {
                warn!(error = %message, "Settings fetch failed, keeping previous values");
                self.update(|view| view.error = Some(message));
                false
            }
        }
    }

    /// Validate and push new settings to the backend
    ///
    /// On success the stored record replaces the current one. On failure the
    /// current record is kept and the error message set. Returns whether the
    /// save succeeded.
    pub async fn save_settings(&self, settings: SettingsRecord) -> bool {
        if let Err(reason) = settings.validate() {
            warn!(error = %reason, "Refusing to save invalid settings");
            self.update(|view| view.error = Some(reason));
            return false;
        }

        match self.resolver.save_settings(&settings).await.into_result() {
            Ok((stored, source)) => {
                info!("Settings saved");
                self.update(|view| {
                    view.settings = stored;
                    view.source = Some(source);
                    view.error = None;
                });
                true
            }
            Err((message, _)) => {
                warn!(error = %message, "Settings save failed");
                self.update(|view| view.error = Some(message));
                false
            }
        }
    }

    /// Current settings record
    pub fn settings(&self) -> SettingsRecord {
        self.read().settings.clone()
    }

    /// Tier of the last successful fetch
    pub fn source(&self) -> Option<Source> {
        self.read().source
    }

    /// Message of the last failed fetch or save
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Whether the current values are demo defaults rather than real data
    pub fn is_demo(&self) -> bool {
        matches!(self.read().source, None | Some(Source::MockData))
    }

    /// Snapshot of everything the settings screen shows
    pub fn view(&self) -> SettingsView {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SettingsView> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut SettingsView)) {
        let mut view = self.view.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut view);
    }
}
