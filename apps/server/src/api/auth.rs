//! Authentication API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use identity::{
    IdentityProvider, LoginRequest, RefreshTokensRequest, RegisterRequest, TokenSet,
};
use serde::Deserialize;
use user_store::{User, UserStore};

use crate::error::ServerResult;
use crate::state::AppState;

/// Query parameters for email confirmation.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    pub token: String,
}

/// Exchanges end-user credentials for a token set.
pub async fn login<P: IdentityProvider, S: UserStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<TokenSet>> {
    let tokens = state.broker.login(&request).await?;
    Ok(Json(tokens))
}

/// Exchanges a refresh token for a fresh token set.
pub async fn refresh_tokens<P: IdentityProvider, S: UserStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(request): Json<RefreshTokensRequest>,
) -> ServerResult<Json<TokenSet>> {
    let tokens = state.broker.refresh_tokens(&request).await?;
    Ok(Json(tokens))
}

/// Registers a user at the provider and mirrors it locally.
pub async fn register<P: IdentityProvider, S: UserStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(request): Json<RegisterRequest>,
) -> ServerResult<StatusCode> {
    state.broker.register(&request).await?;
    Ok(StatusCode::OK)
}

/// Confirms a user's email address from a confirmation token.
pub async fn confirm_user<P: IdentityProvider, S: UserStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Query(query): Query<ConfirmQuery>,
) -> ServerResult<Json<User>> {
    let user = state.broker.confirm_user(&query.token).await?;
    Ok(Json(user))
}
