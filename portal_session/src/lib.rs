//! portal_session - Client-side session management for the campus portal API
//!
//! This crate tracks the signed-in user for a portal client: it restores and
//! verifies persisted credentials on startup, performs login, registration
//! and logout against the backend HTTP API, and mirrors the resulting session
//! state for UI consumers.

mod api;
mod config;
mod session;
mod storage;

#[cfg(test)]
mod test_utils;

// Re-export the API client surface
pub use api::{
    ApiError, AuthApi, AuthResponse, CurrentUserResponse, HttpAuthApi, LoginCredentials,
    RegistrationForm,
};

// Re-export the backend base URL configuration
pub use config::PORTAL_API_BASE_URL;

pub use session::{
    DevBypassConfig, LoginOutcome, RegisterOutcome, Role, SessionManager, SessionOptions,
    SessionSnapshot, UserRecord,
};

pub use storage::{CredentialStore, FileCredentialStore, InMemoryCredentialStore, StorageError};
