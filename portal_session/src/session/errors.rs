use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Internal session-management failures.
///
/// Login, registration and verification fold these into the session state
/// instead of returning them; the type only carries failures between the
/// manager and its collaborators.
#[derive(Debug, Error, Clone)]
pub(crate) enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Api error: {0}")]
    Api(#[from] ApiError),
}
