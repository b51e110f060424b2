//! User store error types.

use thiserror::Error;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// No user matches the lookup.
    #[error("User not found")]
    NotFound,

    /// No user matches the confirmation token.
    #[error("Invalid confirmation token")]
    InvalidToken,

    /// A uniqueness invariant would be violated.
    #[error("{field} already exists: {value}")]
    AlreadyExists { field: &'static str, value: String },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserStoreError {
    /// Creates an already-exists error.
    pub fn already_exists(field: &'static str, value: impl Into<String>) -> Self {
        Self::AlreadyExists {
            field,
            value: value.into(),
        }
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;
