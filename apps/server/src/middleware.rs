//! Request middleware.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ServerError;

/// Requires a bearer token to be present on the request.
///
/// Token verification itself is delegated to the deployment's external
/// verifier; this layer only refuses requests that carry no token at all.
pub async fn require_bearer(request: Request, next: Next) -> Response {
    let has_bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.strip_prefix("Bearer ").is_some_and(|t| !t.is_empty()));

    if !has_bearer {
        return ServerError::AuthenticationRequired.into_response();
    }

    next.run(request).await
}
