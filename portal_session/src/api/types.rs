use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::{Role, UserRecord};

use super::errors::ApiError;

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Form submitted to the registration endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Body returned by the login, registration and refresh-token endpoints.
///
/// The backend reports rejections both as non-2xx statuses and as 2xx bodies
/// with `success: false`; callers must handle both.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body returned by the current-user endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub data: UserRecord,
}

/// Operations the portal backend exposes for authentication.
///
/// [`crate::SessionManager`] is written against this trait; tests substitute
/// a scripted implementation, and [`super::HttpAuthApi`] is the production
/// one.
#[async_trait]
pub trait AuthApi: Send + Sync + 'static {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError>;

    async fn register(&self, form: &RegistrationForm) -> Result<AuthResponse, ApiError>;

    /// Exchange the current token for a fresh one. Authenticated with the
    /// token passed explicitly, not the attached one.
    async fn refresh_token(&self, current_token: &str) -> Result<AuthResponse, ApiError>;

    /// Fetch the user record for the attached bearer token.
    async fn current_user(&self) -> Result<CurrentUserResponse, ApiError>;

    /// Attach or clear the bearer credential used on subsequent requests.
    fn set_auth_token(&self, token: Option<&str>);
}
