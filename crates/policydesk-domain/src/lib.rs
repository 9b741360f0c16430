//! PolicyDesk Domain Layer
//!
//! This crate contains the value types and collaborator traits shared by the
//! PolicyDesk client crates. Apart from `serde` derives for the wire and cache
//! encodings it has no external dependencies.
//!
//! ## Key Concepts
//!
//! - **Session**: the authenticated user plus the opaque token that grants access
//! - **Provenance**: which resolver tier (backend, cache, demo data) produced a value
//! - **Cache keys**: the four locally persisted data kinds
//! - **Settings**: business settings encoded as decimal strings
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Storage and transport implementations live in other crates
//! - Trait definitions for every external interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache_key;
pub mod identity;
pub mod provenance;
pub mod records;
pub mod session;
pub mod settings;
pub mod traits;

// Re-exports for convenience
pub use cache_key::CacheKey;
pub use identity::{Credentials, LoginGrant, Role, UserIdentity};
pub use provenance::{Resolved, Source};
pub use records::{DashboardSummary, DataSource, Policy};
pub use session::SessionState;
pub use settings::SettingsRecord;
pub use traits::{ApiFailure, LocalCache, RemoteApi, TokenStore};
