//! Identity broker: the only component touching both the remote provider and
//! the local user mirror.

use user_store::{UnitOfWork, User, UserStore};

use crate::{
    CONFIRMATION_TOKEN_LEN, ConfirmationMailer, IdentityError, IdentityProvider, IdentityResult,
    LoginRequest, RefreshTokensRequest, RegisterRequest, RemoteUser, TokenSet,
};

/// Orchestrates login, token refresh, registration, admin user listing and
/// the email-confirmation state machine.
///
/// Every operation is a sequential pipeline that short-circuits on the first
/// failing stage and returns that failure unchanged.
pub struct IdentityBroker<P, S> {
    provider: P,
    store: S,
    mailer: Box<dyn ConfirmationMailer>,
}

impl<P: IdentityProvider, S: UserStore> IdentityBroker<P, S> {
    /// Creates a broker over a provider client, a user store and a mailer.
    pub fn new(provider: P, store: S, mailer: Box<dyn ConfirmationMailer>) -> Self {
        Self {
            provider,
            store,
            mailer,
        }
    }

    /// Exchanges end-user credentials for tokens. No local state is touched.
    pub async fn login(&self, request: &LoginRequest) -> IdentityResult<TokenSet> {
        self.provider
            .login(&request.username, &request.password)
            .await
    }

    /// Exchanges a refresh token for fresh tokens. No local state is touched.
    pub async fn refresh_tokens(&self, request: &RefreshTokensRequest) -> IdentityResult<TokenSet> {
        self.provider.refresh(&request.refresh_token).await
    }

    /// Registers a user at the provider and mirrors it locally.
    ///
    /// The remote account is created first; no local record exists unless
    /// remote creation succeeded. A local write failure after remote success
    /// leaves the two sides inconsistent and is logged distinctly for a
    /// reconciliation job to pick up.
    pub async fn register(&self, request: &RegisterRequest) -> IdentityResult<()> {
        let admin = self.admin_token().await?;
        let provider_id = self
            .provider
            .create_user(&admin.access_token, request)
            .await?;

        let token = generate_confirmation_token();
        let user = User::new(
            &provider_id,
            &request.email,
            &request.first_name,
            &request.last_name,
            &token,
        );

        let mut uow = self.store.begin();
        let staged = match uow.add(user) {
            Ok(user) => uow.commit().await.map(|_| user),
            Err(err) => Err(err),
        };
        let user = match staged {
            Ok(user) => user,
            Err(err) => {
                tracing::error!(
                    %provider_id,
                    error = %err,
                    "remote account exists but the local mirror write failed; \
                     records are inconsistent with the remote provider"
                );
                return Err(err.into());
            }
        };

        // The account is already usable; a failed email never unwinds it.
        if let Err(err) = self.mailer.send_confirmation(&user.email, &token).await {
            tracing::warn!(email = %user.email, error = %err, "confirmation email dispatch failed");
        }

        tracing::info!(%provider_id, email = %user.email, "user registered");
        Ok(())
    }

    /// Lists the users known to the remote provider.
    pub async fn get_users(&self) -> IdentityResult<Vec<RemoteUser>> {
        let admin = self.admin_token().await?;
        self.provider.list_users(&admin.access_token).await
    }

    /// Confirms a user's email address from a confirmation token.
    ///
    /// Stage order matters: an unknown token never touches the provider, and
    /// the token is only consumed after the provider acknowledged the
    /// verification, so a failed remote call leaves a retry with the same
    /// token possible.
    pub async fn confirm_user(&self, token: &str) -> IdentityResult<User> {
        let mut user = self.store.get_by_confirmation_token(token).await?;

        let admin = self.admin_token().await?;
        self.provider
            .mark_email_verified(&admin.access_token, &user.provider_id)
            .await?;

        user.confirm_email();
        let mut uow = self.store.begin();
        let staged = match uow.update(user) {
            Ok(user) => uow.commit().await.map(|_| user),
            Err(err) => Err(err),
        };
        match staged {
            Ok(user) => {
                tracing::info!(provider_id = %user.provider_id, "email confirmed");
                Ok(user)
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    "remote email verified but the local commit failed; \
                     records are inconsistent with the remote provider"
                );
                Err(err.into())
            }
        }
    }

    async fn admin_token(&self) -> IdentityResult<TokenSet> {
        match self.provider.acquire_admin_token().await {
            Some(tokens) => Ok(tokens),
            None => {
                tracing::warn!("admin token acquisition failed");
                Err(IdentityError::AdminAuth)
            }
        }
    }
}

/// Generates a fresh random confirmation token.
fn generate_confirmation_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..CONFIRMATION_TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
