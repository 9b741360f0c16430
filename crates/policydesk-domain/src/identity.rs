//! User identity and login types

use serde::{Deserialize, Serialize};

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operations staff
    Ops,

    /// Founder with full access
    Founder,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ops => "ops",
            Role::Founder => "founder",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ops" => Some(Role::Ops),
            "founder" => Some(Role::Founder),
            _ => None,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// Identity of the signed-in user
///
/// Never patched in place: a profile refresh replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Backend user identifier
    pub id: String,

    /// Login email
    pub email: String,

    /// Display name
    pub name: String,

    /// Access role
    pub role: Role,
}

/// Email/password login credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email
    pub email: String,

    /// Plain-text password, only ever sent to the backend
    pub password: String,
}

impl Credentials {
    /// Create a new credentials pair
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token and identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    /// Opaque session token
    pub token: String,

    /// The authenticated user
    pub user: UserIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let user: UserIdentity = serde_json::from_str(
            r#"{"id":"1","email":"a@b.com","name":"A","role":"ops"}"#,
        )
        .unwrap();
        assert_eq!(user.role, Role::Ops);

        let json = serde_json::to_string(&Role::Founder).unwrap();
        assert_eq!(json, "\"founder\"");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<UserIdentity, _> = serde_json::from_str(
            r#"{"id":"1","email":"a@b.com","name":"A","role":"admin"}"#,
        );
        assert!(result.is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("x@y.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("x@y.com"));
        assert!(!debug.contains("hunter2"));
    }
}
