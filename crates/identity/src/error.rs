//! Identity error types.

use thiserror::Error;
use user_store::UserStoreError;

/// Errors that can occur while talking to the identity provider or keeping
/// the local mirror in step with it.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the end user's credentials.
    #[error("Invalid username or password. Details: {detail}")]
    RemoteAuth { detail: String },

    /// The provider rejected the refresh token.
    #[error("Failed to refresh token. Details: {detail}")]
    RemoteRefresh { detail: String },

    /// The service-level admin token could not be acquired. Never caused by
    /// the end user.
    #[error("Unable to authenticate with Keycloak")]
    AdminAuth,

    /// A non-2xx response from an admin call, with the upstream body.
    #[error("{context}. Details: {detail}")]
    Remote {
        context: &'static str,
        detail: String,
    },

    /// Malformed or unexpected JSON from the provider.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// User creation succeeded but the response carried no `Location` header
    /// to take the new identifier from.
    #[error("Missing Location header in user creation response")]
    MissingLocation,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local mirror lookup or persistence failure.
    #[error(transparent)]
    Store(#[from] UserStoreError),

    /// A required configuration value is missing.
    #[error("Configuration error: {0} not set")]
    Configuration(&'static str),
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
