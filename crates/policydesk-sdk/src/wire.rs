//! Request and response shapes of the backend JSON API.

use crate::error::SdkError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Login email
    pub email: &'a str,
    /// Plain-text password
    pub password: &'a str,
}

/// Response envelope used by every backend endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Whether the backend accepted the request
    #[serde(default)]
    pub success: bool,

    /// Payload of a successful response
    pub data: Option<T>,

    /// Error description of a refused request
    pub error: Option<String>,

    /// Free-form message, sometimes used instead of `error`
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Best available description of why the request was refused
    pub fn failure_message(&self, status: StatusCode) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", status))
    }

    /// Turn the envelope into its payload, classifying refusals
    pub fn into_data(self, status: StatusCode) -> Result<T, SdkError> {
        if !status.is_success() || !self.success {
            let message = self.failure_message(status);
            return Err(refusal(status, message));
        }

        self.data
            .ok_or_else(|| SdkError::InvalidResponse("response carried no data".to_string()))
    }

    /// Check a response whose payload is irrelevant
    pub fn into_ack(self, status: StatusCode) -> Result<(), SdkError> {
        if !status.is_success() || !self.success {
            let message = self.failure_message(status);
            return Err(refusal(status, message));
        }
        Ok(())
    }
}

/// Classify a refusal by status code
pub fn refusal(status: StatusCode, message: String) -> SdkError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SdkError::AuthError(message),
        s if s.is_server_error() => SdkError::ServerError(s.as_u16()),
        _ => SdkError::Rejected(message),
    }
}
