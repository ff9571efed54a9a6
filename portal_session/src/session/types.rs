use serde::{Deserialize, Serialize};

/// Role assigned to a portal account by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
    /// Roles this client version does not know about yet.
    #[serde(untagged)]
    Other(String),
}

/// User record as returned by the portal backend.
///
/// Only `id`, `username` and `role` are always present; the profile fields
/// depend on the endpoint that produced the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user identifier.
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Point-in-time copy of the session state, for UI consumers.
///
/// `loading` is true while the initial credential verification has not
/// resolved; consumers gate rendering on it. `error` carries the last
/// login/registration failure message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<UserRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Result of a login attempt, as reported to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl LoginOutcome {
    pub(crate) fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub(crate) fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: Option<String>,
    /// Set when a faculty registration was accepted but is held for admin
    /// approval; no session was started in that case.
    pub pending_approval: bool,
}
