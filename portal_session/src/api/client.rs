use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::PORTAL_API_BASE_URL;

use super::errors::ApiError;
use super::types::{
    AuthApi, AuthResponse, CurrentUserResponse, LoginCredentials, RegistrationForm,
};

const LOGIN_PATH: &str = "/api/auth/login";
const REGISTER_PATH: &str = "/api/auth/register";
const REFRESH_TOKEN_PATH: &str = "/api/auth/refresh-token";
const CURRENT_USER_PATH: &str = "/api/auth/me";

/// reqwest-backed [`AuthApi`] implementation for the portal backend.
///
/// Holds the attachable bearer credential; once attached it is sent on every
/// subsequent request until cleared.
pub struct HttpAuthApi {
    base_url: Url,
    client: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl HttpAuthApi {
    /// Create a client against the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid base URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            client: get_client(),
            bearer: RwLock::new(None),
        })
    }

    /// Create a client against `PORTAL_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(PORTAL_API_BASE_URL.as_str())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("Invalid endpoint {path}: {e}")))
    }

    fn bearer(&self) -> Option<String> {
        self.bearer.read().expect("bearer lock poisoned").clone()
    }

    async fn post_auth<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<AuthResponse, ApiError> {
        let mut request = self.client.post(self.endpoint(path)?).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!("{} response ({}): {}", path, status, response_body);

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message_from_body(&response_body)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        serde_json::from_str(&response_body)
            .map_err(|e| ApiError::Serde(format!("Failed to deserialize response body: {e}")))
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.post_auth(LOGIN_PATH, credentials, None).await
    }

    async fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
        self.post_auth(REGISTER_PATH, form, None).await
    }

    async fn refresh_token(&self, current_token: &str) -> Result<AuthResponse, ApiError> {
        self.post_auth(REFRESH_TOKEN_PATH, &serde_json::json!({}), Some(current_token))
            .await
    }

    async fn current_user(&self) -> Result<CurrentUserResponse, ApiError> {
        let mut request = self.client.get(self.endpoint(CURRENT_USER_PATH)?);
        if let Some(token) = self.bearer() {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: error_message_from_body(&response_body)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        serde_json::from_str(&response_body)
            .map_err(|e| ApiError::Serde(format!("Failed to deserialize response body: {e}")))
    }

    fn set_auth_token(&self, token: Option<&str>) {
        *self.bearer.write().expect("bearer lock poisoned") = token.map(str::to_string);
    }
}

/// Best-effort extraction of the `message` field from an error body.
fn error_message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Creates a configured HTTP client for portal API operations with the
/// following settings:
///
/// - `timeout`: Set to 30 seconds so an unreachable backend cannot hang a
///   login or verification indefinitely.
///
/// - `pool_idle_timeout`: Set to default (90 seconds). This controls how long
///   an idle connection can stay in the connection pool before being removed.
fn get_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .expect("Failed to create reqwest client")
}
