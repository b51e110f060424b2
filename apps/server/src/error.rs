//! Server error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Server error type.
///
/// Expected failures all surface as a 400-class response carrying the
/// failure's message; a 500 only appears for states that indicate a
/// programming defect or misconfiguration, never an ordinary outcome.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A broker operation failed.
    #[error(transparent)]
    Broker(#[from] identity::IdentityError),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Broker(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ServerError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            ServerError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = json!({
            "error": {
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use identity::IdentityError;

    use super::*;

    #[test]
    fn test_broker_failures_map_to_bad_request() {
        let response = ServerError::from(IdentityError::AdminAuth).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ServerError::from(IdentityError::RemoteAuth {
            detail: "invalid_grant".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = ServerError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
