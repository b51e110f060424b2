//! API endpoints.

pub mod auth;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use identity::IdentityProvider;
use user_store::UserStore;

use crate::middleware::require_bearer;
use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<P, S>() -> Router<Arc<AppState<P, S>>>
where
    P: IdentityProvider + 'static,
    S: UserStore + 'static,
{
    // Bearer presence is only enforced on the admin surface.
    let admin = Router::new()
        .route("/api/users", get(users::get_users))
        .route_layer(axum::middleware::from_fn(require_bearer));

    Router::new()
        // Auth endpoints
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh_tokens))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/confirm", get(auth::confirm_user))
        .merge(admin)
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
