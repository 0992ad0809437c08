//! Error type returned by every contact store operation.

use thiserror::Error;

/// Classified failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store is closed")]
    Closed,

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn client_not_found(client_id: i32) -> Self {
        StoreError::NotFound(format!("Client with ID {} not found", client_id))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("Resource not found".into()),
            sqlx::Error::PoolClosed => StoreError::Closed,
            sqlx::Error::PoolTimedOut => {
                StoreError::Connection("Timed out acquiring a database connection".into())
            }
            sqlx::Error::Io(e) => StoreError::Connection(e.to_string()),
            sqlx::Error::Tls(e) => StoreError::Connection(e.to_string()),
            sqlx::Error::Protocol(msg) => StoreError::Connection(msg),
            sqlx::Error::WorkerCrashed => {
                StoreError::Connection("Database connection worker crashed".into())
            }
            sqlx::Error::Database(db_err) => {
                let subject = db_err
                    .constraint()
                    .map(|c| format!(" ({})", c))
                    .unwrap_or_default();
                match db_err.code().as_deref() {
                    Some("23505") => {
                        StoreError::Conflict(format!("Resource already exists{}", subject))
                    }
                    Some("23503") => {
                        StoreError::NotFound(format!("Referenced resource not found{}", subject))
                    }
                    Some("23502") | Some("22001") | Some("23514") => {
                        StoreError::Validation(db_err.message().to_string())
                    }
                    _ => StoreError::Database(db_err.to_string()),
                }
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        messages.sort();

        StoreError::Validation(messages.join("; "))
    }
}
