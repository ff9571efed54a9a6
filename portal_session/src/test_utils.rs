//! Shared test helpers: a scripted API client and session manager
//! construction over the in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::api::{
    ApiError, AuthApi, AuthResponse, CurrentUserResponse, LoginCredentials, RegistrationForm,
};
use crate::session::{Role, SessionManager, SessionOptions, UserRecord};
use crate::storage::{CredentialStore, InMemoryCredentialStore};

type Scripted<T> = StdMutex<Option<Result<T, ApiError>>>;

/// Scripted [`AuthApi`] recording every call it receives.
///
/// Each operation replays its scripted response on every call; an operation
/// with no script fails with a transport error, so tests only script what
/// they expect to be reached.
#[derive(Default)]
pub(crate) struct MockAuthApi {
    login_response: Scripted<AuthResponse>,
    register_response: Scripted<AuthResponse>,
    refresh_response: Scripted<AuthResponse>,
    current_user_response: Scripted<CurrentUserResponse>,

    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    current_user_calls: AtomicUsize,

    /// Every `set_auth_token` call, in order.
    attached_tokens: StdMutex<Vec<Option<String>>>,

    /// When set, `refresh_token` blocks until the gate is notified. Used to
    /// interleave a manual operation with an in-flight verification.
    refresh_gate: StdMutex<Option<Arc<Notify>>>,
}

impl MockAuthApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_login(self, response: Result<AuthResponse, ApiError>) -> Self {
        *self.login_response.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn with_register(self, response: Result<AuthResponse, ApiError>) -> Self {
        *self.register_response.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn with_refresh(self, response: Result<AuthResponse, ApiError>) -> Self {
        *self.refresh_response.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn with_current_user(
        self,
        response: Result<CurrentUserResponse, ApiError>,
    ) -> Self {
        *self.current_user_response.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn with_refresh_gate(self, gate: Arc<Notify>) -> Self {
        *self.refresh_gate.lock().unwrap() = Some(gate);
        self
    }

    /// Re-script the login response mid-test.
    pub(crate) fn set_login(&self, response: Result<AuthResponse, ApiError>) {
        *self.login_response.lock().unwrap() = Some(response);
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn current_user_calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn attached_tokens(&self) -> Vec<Option<String>> {
        self.attached_tokens.lock().unwrap().clone()
    }
}

fn replay<T: Clone>(slot: &Scripted<T>) -> Result<T, ApiError> {
    slot.lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        replay(&self.login_response)
    }

    async fn register(&self, _form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        replay(&self.register_response)
    }

    async fn refresh_token(&self, _current_token: &str) -> Result<AuthResponse, ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.refresh_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        replay(&self.refresh_response)
    }

    async fn current_user(&self) -> Result<CurrentUserResponse, ApiError> {
        self.current_user_calls.fetch_add(1, Ordering::SeqCst);
        replay(&self.current_user_response)
    }

    fn set_auth_token(&self, token: Option<&str>) {
        self.attached_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
    }
}

pub(crate) fn sample_user(username: &str, role: Role) -> UserRecord {
    UserRecord {
        id: format!("id-{username}"),
        username: username.to_string(),
        role,
        firstname: None,
        lastname: None,
        department: None,
    }
}

pub(crate) fn success_response(token: &str, user: &UserRecord) -> AuthResponse {
    AuthResponse {
        success: true,
        token: Some(token.to_string()),
        user: Some(user.clone()),
        message: None,
    }
}

pub(crate) fn failure_response(message: Option<&str>) -> AuthResponse {
    AuthResponse {
        success: false,
        token: None,
        user: None,
        message: message.map(str::to_string),
    }
}

pub(crate) type SharedStore = Arc<Mutex<Box<dyn CredentialStore>>>;

pub(crate) fn memory_store() -> SharedStore {
    Arc::new(Mutex::new(Box::new(InMemoryCredentialStore::new())))
}

/// Build a manager over a fresh in-memory store, returning the store handle
/// for seeding and inspection.
pub(crate) fn manager_with(
    api: Arc<MockAuthApi>,
    options: SessionOptions,
) -> (SessionManager, SharedStore) {
    let store = memory_store();
    let manager = SessionManager::new(api, Arc::clone(&store), options);
    (manager, store)
}

/// Options with the development bypass configured, as a local build would
/// run.
pub(crate) fn dev_options() -> SessionOptions {
    SessionOptions {
        dev_bypass: Some(crate::session::DevBypassConfig::default()),
        ..SessionOptions::default()
    }
}
