//! idgate server.
//!
//! A thin HTTP boundary over the identity broker: requests are mapped to
//! broker operations and broker failures are mapped to 400-class responses.
//! Everything else (credential checks, email verification state) lives at
//! the remote provider or in the local user mirror.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::Router;
use identity::IdentityProvider;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use user_store::UserStore;

use crate::state::AppState;

/// Creates the application router with all routes configured.
pub fn create_app<P, S>(state: Arc<AppState<P, S>>) -> Router
where
    P: IdentityProvider + 'static,
    S: UserStore + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
