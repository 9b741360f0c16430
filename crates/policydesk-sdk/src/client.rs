//! HTTP client for the PolicyDesk backend.

use crate::error::SdkError;
use crate::wire::{refusal, Envelope, LoginRequest};
use policydesk_domain::traits::{RemoteApi, TokenStore};
use policydesk_domain::{
    ApiFailure, Credentials, DashboardSummary, DataSource, LoginGrant, Policy, SettingsRecord,
    UserIdentity,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for backend requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Typed client for the backend JSON API
///
/// Reads the session token from the shared token store on every request, so a
/// login or logout performed by the session manager takes effect immediately.
pub struct HttpApiClient<T> {
    base_url: String,
    http: reqwest::Client,
    tokens: Arc<T>,
}

impl<T: TokenStore> HttpApiClient<T> {
    /// Create a new client with the default timeout
    pub fn new(base_url: &str, tokens: Arc<T>) -> Result<Self, SdkError> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new client with an explicit per-request timeout
    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<T>,
        timeout: Duration,
    ) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            tokens,
        })
    }

    /// Backend base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request, attaching the bearer token when one is stored
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Backend request");
        let builder = self.http.request(method, url);

        match self.tokens.get_token() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                warn!(error = %e, "Could not read session token, sending request unauthenticated");
                builder
            }
        }
    }

    /// Send a request and decode the response envelope
    async fn send<R: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<(StatusCode, Envelope<R>), SdkError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_server_error() {
            return Err(SdkError::ServerError(status.as_u16()));
        }

        match serde_json::from_slice::<Envelope<R>>(&body) {
            Ok(envelope) => Ok((status, envelope)),
            // Error pages from proxies are not JSON
            Err(_) if !status.is_success() => Err(refusal(status, format!("HTTP {}", status))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, SdkError> {
        let (status, envelope) = self.send(self.request(Method::GET, path)).await?;
        envelope.into_data(status)
    }

    async fn send_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, SdkError> {
        let builder = self.request(method, path).json(body);
        let (status, envelope) = self.send(builder).await?;
        envelope.into_data(status)
    }

    /// POST /api/auth/login
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, SdkError> {
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.send_json(Method::POST, "/api/auth/login", &body).await
    }

    /// GET /api/auth/profile
    pub async fn get_profile(&self) -> Result<UserIdentity, SdkError> {
        self.get("/api/auth/profile").await
    }

    /// POST /api/auth/logout
    pub async fn logout(&self) -> Result<(), SdkError> {
        let builder = self.request(Method::POST, "/api/auth/logout");
        let (status, envelope) = self.send::<serde_json::Value>(builder).await?;
        envelope.into_ack(status)
    }

    /// GET /api/data-sources
    pub async fn get_data_sources(&self) -> Result<Vec<DataSource>, SdkError> {
        self.get("/api/data-sources").await
    }

    /// GET /api/settings
    pub async fn get_settings(&self) -> Result<SettingsRecord, SdkError> {
        self.get("/api/settings").await
    }

    /// PUT /api/settings
    pub async fn update_settings(
        &self,
        settings: &SettingsRecord,
    ) -> Result<SettingsRecord, SdkError> {
        self.send_json(Method::PUT, "/api/settings", settings).await
    }

    /// GET /api/policies
    pub async fn get_policies(&self) -> Result<Vec<Policy>, SdkError> {
        self.get("/api/policies").await
    }

    /// GET /api/dashboard/stats
    pub async fn get_dashboard(&self) -> Result<DashboardSummary, SdkError> {
        self.get("/api/dashboard/stats").await
    }
}

impl<T> RemoteApi for HttpApiClient<T>
where
    T: TokenStore + Send + Sync,
{
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, ApiFailure> {
        HttpApiClient::login(self, credentials)
            .await
            .map_err(ApiFailure::from)
    }

    async fn get_profile(&self) -> Result<UserIdentity, ApiFailure> {
        HttpApiClient::get_profile(self).await.map_err(ApiFailure::from)
    }

    async fn logout(&self) -> Result<(), ApiFailure> {
        HttpApiClient::logout(self).await.map_err(ApiFailure::from)
    }

    async fn get_data_sources(&self) -> Result<Vec<DataSource>, ApiFailure> {
        HttpApiClient::get_data_sources(self)
            .await
            .map_err(ApiFailure::from)
    }

    async fn get_settings(&self) -> Result<SettingsRecord, ApiFailure> {
        HttpApiClient::get_settings(self).await.map_err(ApiFailure::from)
    }

    async fn update_settings(
        &self,
        settings: &SettingsRecord,
    ) -> Result<SettingsRecord, ApiFailure> {
        HttpApiClient::update_settings(self, settings)
            .await
            .map_err(ApiFailure::from)
    }

    async fn get_policies(&self) -> Result<Vec<Policy>, ApiFailure> {
        HttpApiClient::get_policies(self).await.map_err(ApiFailure::from)
    }

    async fn get_dashboard(&self) -> Result<DashboardSummary, ApiFailure> {
        HttpApiClient::get_dashboard(self)
            .await
            .map_err(ApiFailure::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policydesk_store::MemoryStore;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            HttpApiClient::new("http://localhost:3001/", Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_failure() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let client = HttpApiClient::with_timeout(
            "http://127.0.0.1:9",
            Arc::new(MemoryStore::new()),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = RemoteApi::get_settings(&client).await;
        assert!(matches!(result, Err(ApiFailure::Transport(_))));
    }
}
