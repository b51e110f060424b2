//! Identity provider trait definition.

use async_trait::async_trait;

use crate::{IdentityResult, RegisterRequest, RemoteUser, TokenSet};

/// Raw operations against the remote identity provider.
///
/// The broker only talks to this trait, which keeps it testable against a
/// double; `KeycloakClient` is the production implementation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges end-user credentials for a token set (password grant).
    async fn login(&self, username: &str, password: &str) -> IdentityResult<TokenSet>;

    /// Exchanges a refresh token for a fresh token set.
    async fn refresh(&self, refresh_token: &str) -> IdentityResult<TokenSet>;

    /// Acquires a service-level admin token.
    ///
    /// Returns `None` on any failure; this is an internal step that is logged
    /// rather than surfaced raw to callers.
    async fn acquire_admin_token(&self) -> Option<TokenSet>;

    /// Creates a user at the provider and returns its new identifier.
    async fn create_user(
        &self,
        admin_token: &str,
        request: &RegisterRequest,
    ) -> IdentityResult<String>;

    /// Lists the users the provider knows about.
    async fn list_users(&self, admin_token: &str) -> IdentityResult<Vec<RemoteUser>>;

    /// Flags a user's email address as verified at the provider.
    async fn mark_email_verified(
        &self,
        admin_token: &str,
        provider_id: &str,
    ) -> IdentityResult<()>;
}
