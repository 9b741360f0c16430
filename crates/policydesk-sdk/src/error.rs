//! Error types for the PolicyDesk SDK.

use policydesk_domain::ApiFailure;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Connection error (network, DNS, refused)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request did not complete in time
    #[error("Request timeout")]
    Timeout,

    /// Backend answered with a 5xx status
    #[error("Server error (HTTP {0})")]
    ServerError(u16),

    /// Backend refused the request (bad credentials, validation failure)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Authentication or authorization error (HTTP 401/403)
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Other HTTP client failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Local storage failure
    #[error("Storage error: {0}")]
    Store(#[from] policydesk_store::StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Timeout
        } else if e.is_connect() {
            SdkError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if e.is_status() {
            match e.status() {
                Some(status) if status.is_server_error() => SdkError::ServerError(status.as_u16()),
                Some(status) if status.is_client_error() => {
                    SdkError::Rejected(format!("HTTP {}", status))
                }
                _ => SdkError::Http(e.to_string()),
            }
        } else {
            SdkError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}

impl From<SdkError> for ApiFailure {
    /// Refusals by the backend stay rejections; everything else is a
    /// transport-level failure the resolver may recover from.
    fn from(e: SdkError) -> Self {
        match e {
            SdkError::Rejected(msg) | SdkError::AuthError(msg) => ApiFailure::Rejected(msg),
            other => ApiFailure::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_map_to_rejected() {
        let failure = ApiFailure::from(SdkError::Rejected("invalid credentials".to_string()));
        assert_eq!(failure, ApiFailure::Rejected("invalid credentials".to_string()));

        let failure = ApiFailure::from(SdkError::AuthError("token expired".to_string()));
        assert!(failure.is_rejection());
    }

    #[test]
    fn test_transport_errors_map_to_transport() {
        let failure = ApiFailure::from(SdkError::ServerError(502));
        assert_eq!(
            failure,
            ApiFailure::Transport("Server error (HTTP 502)".to_string())
        );
        assert!(!ApiFailure::from(SdkError::Timeout).is_rejection());
    }
}
