//! Error types for generation log storage.

/// Errors returned by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Caller input was malformed (non-positive limit, negative offset, empty field).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No connection string was supplied, or it names an unsupported backend.
    #[error("store not configured: {0}")]
    Unconfigured(String),
    /// The backing database could not be reached or opened.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The database was reachable but refused the write.
    #[error("store rejected write: {0}")]
    Rejected(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;
        match &err {
            rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
                ErrorCode::ConstraintViolation
                | ErrorCode::DiskFull
                | ErrorCode::ReadOnly
                | ErrorCode::TooBig
                | ErrorCode::TypeMismatch => StoreError::Rejected(err.to_string()),
                _ => StoreError::Unavailable(err.to_string()),
            },
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
