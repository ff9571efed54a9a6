use std::env;

use super::types::{Role, UserRecord};

/// Storage keys and behavior switches for a [`super::SessionManager`].
///
/// The two historical portal clients differed only in their dev credentials
/// and in whether verification refreshed the token first; both are expressed
/// here as configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Store key holding the bearer token.
    pub token_key: String,
    /// Store key holding the serialized user record.
    pub user_key: String,
    /// Store key holding the development bypass sentinel.
    pub dev_key: String,
    /// Attempt a token refresh before falling back to a current-user fetch
    /// during verification.
    pub refresh_on_verify: bool,
    /// Development bypass. Leave `None` in production; the bypass paths are
    /// unreachable without it.
    pub dev_bypass: Option<DevBypassConfig>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            dev_key: "dev_key".to_string(),
            refresh_on_verify: true,
            dev_bypass: None,
        }
    }
}

impl SessionOptions {
    /// Build options from the environment.
    ///
    /// `PORTAL_REFRESH_ON_VERIFY` (default "true") toggles the refresh step.
    /// The dev bypass is enabled only on an explicit `PORTAL_DEV_BYPASS=1`
    /// (or "true") so it cannot ship to production by accident.
    pub fn from_env() -> Self {
        let refresh_on_verify = env::var("PORTAL_REFRESH_ON_VERIFY")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let dev_bypass = match env::var("PORTAL_DEV_BYPASS") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => {
                Some(DevBypassConfig::default())
            }
            _ => None,
        };
        Self {
            refresh_on_verify,
            dev_bypass,
            ..Self::default()
        }
    }
}

/// Hardcoded development credentials and the sentinel that marks a bypassed
/// session in the store.
///
/// A trusted-input shortcut for local development, not a security boundary.
#[derive(Debug, Clone)]
pub struct DevBypassConfig {
    pub username: String,
    pub password: String,
    /// Sentinel value written under the dev key.
    pub sentinel: String,
    /// Fixed token persisted for the bypassed session.
    pub token: String,
}

impl Default for DevBypassConfig {
    fn default() -> Self {
        Self {
            username: "dev".to_string(),
            password: "dev123".to_string(),
            sentinel: "dev123".to_string(),
            token: "dev_token".to_string(),
        }
    }
}

impl DevBypassConfig {
    /// Whether the submitted credentials are the development pair.
    pub(crate) fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// The fixed privileged user record for a bypassed session.
    pub fn dev_user(&self) -> UserRecord {
        UserRecord {
            id: "000000000000000000000000".to_string(),
            username: self.username.clone(),
            role: Role::Admin,
            firstname: Some("Dev".to_string()),
            lastname: Some("User".to_string()),
            department: Some("comp".to_string()),
        }
    }
}
