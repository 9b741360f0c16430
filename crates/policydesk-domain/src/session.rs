//! Session lifecycle states

use crate::UserIdentity;

/// Where a session is in its lifecycle
///
/// `Initializing` only exists until the stored token (if any) has been checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup, token restore not yet attempted
    #[default]
    Initializing,

    /// A user is signed in
    Authenticated(UserIdentity),

    /// No user is signed in
    Unauthenticated,
}

impl SessionState {
    /// The signed-in user, if any
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True exactly when a user is present
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Whether the startup restore is still pending
    pub fn is_initializing(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }
}
