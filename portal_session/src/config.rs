//! Central configuration for the portal_session crate

use std::sync::LazyLock;

/// Base URL of the portal backend API
///
/// All endpoints consumed by [`crate::HttpAuthApi`] are resolved against this.
/// Default: "http://localhost:5000"
pub static PORTAL_API_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PORTAL_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
});
