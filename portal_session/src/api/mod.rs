mod client;
mod errors;
mod types;

pub use client::HttpAuthApi;
pub use errors::ApiError;
pub use types::{AuthApi, AuthResponse, CurrentUserResponse, LoginCredentials, RegistrationForm};
