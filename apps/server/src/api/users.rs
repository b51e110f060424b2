//! Admin user-listing endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use identity::{IdentityProvider, RemoteUser};
use user_store::UserStore;

use crate::error::ServerResult;
use crate::state::AppState;

/// Lists the users known to the remote provider.
pub async fn get_users<P: IdentityProvider, S: UserStore>(
    State(state): State<Arc<AppState<P, S>>>,
) -> ServerResult<Json<Vec<RemoteUser>>> {
    let users = state.broker.get_users().await?;
    Ok(Json(users))
}
