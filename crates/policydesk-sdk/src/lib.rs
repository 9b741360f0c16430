//! PolicyDesk Rust SDK
//!
//! Client core for the PolicyDesk insurance CRM: a typed backend client, a
//! dual-storage resolver that falls back from the backend to the local cache
//! to demo data, a session manager, and a settings context.
//!
//! # Example
//!
//! ```no_run
//! use policydesk_domain::Credentials;
//! use policydesk_sdk::{ClientConfig, PolicyDesk};
//!
//! # async fn run() -> Result<(), policydesk_sdk::SdkError> {
//! let desk = PolicyDesk::from_config(ClientConfig::default())?;
//! desk.start().await;
//!
//! if desk.session().login(&Credentials::new("ops@example.com", "secret")).await {
//!     let policies = desk.resolver().policies().await;
//!     println!("{} policies from {}", policies.data().map_or(0, Vec::len), policies.source());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod demo;
pub mod desk;
mod error;
pub mod listeners;
pub mod logging;
pub mod mock;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod token;
pub mod wire;

pub use client::HttpApiClient;
pub use config::{ClientConfig, ConfigError};
pub use demo::CachedResource;
pub use desk::PolicyDesk;
pub use error::SdkError;
pub use listeners::{ListenerRegistry, Subscription};
pub use mock::MockApi;
pub use resolver::{DualStorageResolver, ResolverTier};
pub use session::{SessionManager, SessionSnapshot};
pub use settings::{SettingsContext, SettingsView};
