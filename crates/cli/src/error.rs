use persistence::StoreError;
use thiserror::Error;

/// Failure of a command, rendered on stderr with a distinct exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Store(StoreError::Validation(_)) => 2,
            CliError::Store(StoreError::NotFound(_)) => 3,
            CliError::Store(StoreError::Conflict(_)) => 4,
            CliError::Store(StoreError::Connection(_)) | CliError::Store(StoreError::Closed) => 5,
            CliError::Store(StoreError::Database(_)) | CliError::Io(_) | CliError::Json(_) => 1,
        }
    }
}
