use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};

use crate::api::{AuthApi, AuthResponse, LoginCredentials, RegistrationForm};
use crate::storage::{CredentialStore, StorageError};

use super::config::{DevBypassConfig, SessionOptions};
use super::errors::SessionError;
use super::types::{LoginOutcome, RegisterOutcome, Role, SessionSnapshot, UserRecord};

const LOGIN_FALLBACK_MESSAGE: &str = "Login failed";
const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed";
const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful!";
const FACULTY_PENDING_MESSAGE: &str =
    "Faculty registration submitted for approval. Please wait for admin verification.";

/// Client-side session manager for the portal backend.
///
/// Owns the in-memory session state (current user, loading flag, last error)
/// and mediates every transition between anonymous, verifying and
/// authenticated. The API client and the credential store are injected at
/// construction so tests and alternate frontends can substitute their own.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<Mutex<Box<dyn CredentialStore>>>,
    options: SessionOptions,
    state: RwLock<SessionSnapshot>,
    /// Advanced by every manual operation. A verification holding a stale
    /// generation discards its result instead of overwriting newer state.
    generation: AtomicU64,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<Mutex<Box<dyn CredentialStore>>>,
        options: SessionOptions,
    ) -> Self {
        Self {
            api,
            store,
            options,
            state: RwLock::new(SessionSnapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Point-in-time copy of the session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<UserRecord> {
        self.state.read().await.user.clone()
    }

    /// Run the startup sequence: the development bypass check followed by
    /// credential verification. Call once per application load.
    pub async fn initialize(&self) {
        if self.restore_dev_session().await {
            return;
        }
        self.verify_auth().await;
    }

    /// Restore and validate the persisted session against the backend.
    ///
    /// Refresh-first keeps renewable tokens alive without forcing a fresh
    /// login on every load; the current-user fetch is the fallback for
    /// backends without refresh support. Any failure collapses to the
    /// anonymous state; a half-authenticated session is never presented.
    pub async fn verify_auth(&self) {
        let generation = self.generation.load(Ordering::SeqCst);

        let token = match self.store.lock().await.get(&self.options.token_key).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.commit_session(generation, None).await;
                return;
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted token: {}", e);
                self.invalidate_session(generation).await;
                return;
            }
        };

        self.state.write().await.loading = true;
        self.api.set_auth_token(Some(&token));

        match self.try_restore(generation, &token).await {
            Ok(Some(user)) => self.commit_session(generation, Some(user)).await,
            Ok(None) => {
                tracing::debug!("Discarding stale verification result");
                self.state.write().await.loading = false;
            }
            Err(e) => {
                tracing::debug!("Session verification failed: {}", e);
                self.invalidate_session(generation).await;
            }
        }
    }

    /// Attempt to sign in with the given credentials.
    ///
    /// On failure the in-memory user and the persisted credentials are left
    /// untouched; only the error message changes.
    pub async fn login(&self, credentials: &LoginCredentials) -> LoginOutcome {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.write().await.error = None;

        if let Some(bypass) = &self.options.dev_bypass {
            if bypass.matches(&credentials.username, &credentials.password) {
                return self.login_dev_session(bypass).await;
            }
        }

        match self.api.login(credentials).await {
            Ok(response) => self.adopt_auth_response(response, LOGIN_FALLBACK_MESSAGE).await,
            Err(e) => {
                tracing::debug!("Login request failed: {}", e);
                self.fail_with_message(e.server_message().unwrap_or(LOGIN_FALLBACK_MESSAGE))
                    .await
            }
        }
    }

    /// Submit a registration.
    ///
    /// A successful faculty registration does not start a session; it is
    /// held for admin approval. Any other role is signed in immediately,
    /// exactly like a successful login.
    pub async fn register(&self, form: &RegistrationForm) -> RegisterOutcome {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.write().await.error = None;

        match self.api.register(form).await {
            Ok(response) if response.success => {
                if form.role == Role::Faculty {
                    return RegisterOutcome {
                        success: true,
                        message: Some(FACULTY_PENDING_MESSAGE.to_string()),
                        pending_approval: true,
                    };
                }
                let outcome = self
                    .adopt_auth_response(response, REGISTER_FALLBACK_MESSAGE)
                    .await;
                RegisterOutcome {
                    message: if outcome.success {
                        Some(REGISTER_SUCCESS_MESSAGE.to_string())
                    } else {
                        outcome.message
                    },
                    success: outcome.success,
                    pending_approval: false,
                }
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| REGISTER_FALLBACK_MESSAGE.to_string());
                let outcome = self.fail_with_message(&message).await;
                RegisterOutcome {
                    success: false,
                    message: outcome.message,
                    pending_approval: false,
                }
            }
            Err(e) => {
                tracing::debug!("Registration request failed: {}", e);
                let outcome = self
                    .fail_with_message(e.server_message().unwrap_or(REGISTER_FALLBACK_MESSAGE))
                    .await;
                RegisterOutcome {
                    success: false,
                    message: outcome.message,
                    pending_approval: false,
                }
            }
        }
    }

    /// Sign out: clear the persisted credentials, detach the token and reset
    /// the in-memory state. Calling it while already anonymous is a no-op.
    pub async fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.clear_credentials().await;
        self.api.set_auth_token(None);
        let mut state = self.state.write().await;
        state.user = None;
        state.error = None;
    }

    /// Development bypass check. Restores the fixed privileged user when the
    /// configured sentinel is present in the store; unreachable without a
    /// [`DevBypassConfig`] in the options.
    async fn restore_dev_session(&self) -> bool {
        let Some(bypass) = &self.options.dev_bypass else {
            return false;
        };

        let sentinel = match self.store.lock().await.get(&self.options.dev_key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read dev sentinel: {}", e);
                None
            }
        };
        if sentinel.as_deref() != Some(bypass.sentinel.as_str()) {
            return false;
        }

        tracing::info!("Dev sentinel found, restoring dev session");
        let dev_user = bypass.dev_user();
        if let Err(e) = self.persist_user(&dev_user).await {
            tracing::warn!("Failed to persist dev user: {}", e);
        }
        let mut state = self.state.write().await;
        state.user = Some(dev_user);
        state.loading = false;
        true
    }

    /// Sign in with the development credentials without contacting the
    /// backend.
    async fn login_dev_session(&self, bypass: &DevBypassConfig) -> LoginOutcome {
        tracing::info!("Dev credentials detected, bypassing the backend");
        let dev_user = bypass.dev_user();

        if let Err(e) = self.persist_credentials(&bypass.token, &dev_user).await {
            tracing::warn!("Failed to persist dev credentials: {}", e);
        }
        if let Err(e) = self
            .store
            .lock()
            .await
            .put(&self.options.dev_key, &bypass.sentinel)
            .await
        {
            tracing::warn!("Failed to persist dev sentinel: {}", e);
        }

        self.api.set_auth_token(Some(&bypass.token));
        let mut state = self.state.write().await;
        state.user = Some(dev_user);
        state.error = None;
        LoginOutcome::ok()
    }

    /// Refresh-first validation of a stored token. `Ok(None)` means the
    /// result was discarded because a newer operation ran in the meantime.
    async fn try_restore(
        &self,
        generation: u64,
        token: &str,
    ) -> Result<Option<UserRecord>, SessionError> {
        if self.options.refresh_on_verify {
            match self.api.refresh_token(token).await {
                Ok(response) if response.success => {
                    if let (Some(new_token), Some(user)) = (response.token, response.user) {
                        if !self.is_current(generation) {
                            return Ok(None);
                        }
                        self.persist_credentials(&new_token, &user).await?;
                        self.api.set_auth_token(Some(&new_token));
                        tracing::debug!("Token refreshed during initialization");
                        return Ok(Some(user));
                    }
                    tracing::debug!(
                        "Refresh response incomplete, falling back to current user fetch"
                    );
                }
                Ok(_) => {
                    tracing::debug!(
                        "Token refresh unsuccessful, falling back to current user fetch"
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        "Token refresh failed, falling back to current user fetch: {}",
                        e
                    );
                }
            }
        }

        let response = self.api.current_user().await?;
        let user = response.data;
        if !self.is_current(generation) {
            return Ok(None);
        }
        self.persist_user(&user).await?;
        Ok(Some(user))
    }

    /// Adopt a successful auth response: persist the credential pair, attach
    /// the token, publish the user. Anything short of a complete successful
    /// response is reported as a failure without touching existing state.
    async fn adopt_auth_response(&self, response: AuthResponse, fallback: &str) -> LoginOutcome {
        if response.success {
            if let (Some(token), Some(user)) = (response.token, response.user) {
                if let Err(e) = self.persist_credentials(&token, &user).await {
                    tracing::error!("Failed to persist credentials: {}", e);
                    return self.fail_with_message(fallback).await;
                }
                self.api.set_auth_token(Some(&token));
                let mut state = self.state.write().await;
                state.user = Some(user);
                state.error = None;
                return LoginOutcome::ok();
            }
            tracing::error!("Auth response reported success without token and user");
        }
        let message = response.message.as_deref().unwrap_or(fallback);
        self.fail_with_message(message).await
    }

    async fn fail_with_message(&self, message: &str) -> LoginOutcome {
        self.state.write().await.error = Some(message.to_string());
        LoginOutcome::failed(message)
    }

    /// Commit a verification result unless a newer operation has run. The
    /// loading flag resolves either way; only user state is owned by the
    /// newer operation.
    async fn commit_session(&self, generation: u64, user: Option<UserRecord>) {
        let mut state = self.state.write().await;
        if self.is_current(generation) {
            state.user = user;
        } else {
            tracing::debug!("Discarding stale verification result");
        }
        state.loading = false;
    }

    /// Full session invalidation: clear the persisted credentials and present
    /// the anonymous state.
    async fn invalidate_session(&self, generation: u64) {
        if !self.is_current(generation) {
            tracing::debug!("Discarding stale verification result");
            self.state.write().await.loading = false;
            return;
        }
        self.clear_credentials().await;
        self.api.set_auth_token(None);
        let mut state = self.state.write().await;
        state.user = None;
        state.loading = false;
    }

    /// Persist token and user as a pair. If the user record cannot be
    /// written the token is removed again, so the store never holds exactly
    /// one of the two.
    async fn persist_credentials(
        &self,
        token: &str,
        user: &UserRecord,
    ) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(user).map_err(StorageError::from)?;
        let mut store = self.store.lock().await;
        store
            .put(&self.options.token_key, token)
            .await
            .map_err(SessionError::from)?;
        if let Err(e) = store.put(&self.options.user_key, &serialized).await {
            if let Err(rollback) = store.remove(&self.options.token_key).await {
                tracing::error!(
                    "Failed to roll back token after user write failure: {}",
                    rollback
                );
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Persist the user record alone; the token already in the store stays
    /// valid.
    async fn persist_user(&self, user: &UserRecord) -> Result<(), SessionError> {
        let serialized = serde_json::to_string(user).map_err(StorageError::from)?;
        self.store
            .lock()
            .await
            .put(&self.options.user_key, &serialized)
            .await
            .map_err(SessionError::from)?;
        Ok(())
    }

    /// Remove token, user and the dev sentinel together. Failures on one key
    /// must not short-circuit the others.
    async fn clear_credentials(&self) {
        let mut store = self.store.lock().await;
        for key in [
            &self.options.token_key,
            &self.options.user_key,
            &self.options.dev_key,
        ] {
            if let Err(e) = store.remove(key).await {
                tracing::warn!("Failed to remove {} from credential store: {}", key, e);
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
