//! Demo client: restore a persisted session against a live portal backend,
//! logging in with credentials from the environment when none is restored.
//!
//! Configuration (all via env / `.env`):
//! - `PORTAL_API_BASE_URL`: backend base URL
//! - `PORTAL_CREDENTIAL_FILE`: credential store path (default
//!   `portal-credentials.json`)
//! - `PORTAL_USERNAME` / `PORTAL_PASSWORD`: credentials for a fresh login
//! - `PORTAL_DEV_BYPASS=1`: enable the development bypass

use std::sync::Arc;

use portal_session::{
    CredentialStore, FileCredentialStore, HttpAuthApi, LoginCredentials, SessionManager,
    SessionOptions,
};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api = Arc::new(HttpAuthApi::from_env()?);
    let store_path = std::env::var("PORTAL_CREDENTIAL_FILE")
        .unwrap_or_else(|_| "portal-credentials.json".to_string());
    let store: Arc<Mutex<Box<dyn CredentialStore>>> =
        Arc::new(Mutex::new(Box::new(FileCredentialStore::new(store_path))));

    let manager = SessionManager::new(api, store, SessionOptions::from_env());
    manager.initialize().await;

    if let Some(user) = manager.current_user().await {
        tracing::info!("Restored session for {} ({:?})", user.username, user.role);
        return Ok(());
    }
    tracing::info!("No persisted session");

    let (Ok(username), Ok(password)) = (
        std::env::var("PORTAL_USERNAME"),
        std::env::var("PORTAL_PASSWORD"),
    ) else {
        tracing::info!("Set PORTAL_USERNAME and PORTAL_PASSWORD to try a login");
        return Ok(());
    };

    let outcome = manager.login(&LoginCredentials { username, password }).await;
    if outcome.success {
        let user = manager.current_user().await;
        tracing::info!("Signed in as {:?}", user.map(|u| u.username));
    } else {
        tracing::warn!("Login failed: {:?}", outcome.message);
    }

    Ok(())
}
