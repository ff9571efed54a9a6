use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// The request could not be sent or the response never arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Serde error: {0}")]
    Serde(String),
}

impl ApiError {
    /// The human-readable message carried by a backend rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
