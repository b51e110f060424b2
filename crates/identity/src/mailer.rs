//! Confirmation email seam.

use async_trait::async_trait;

use crate::IdentityResult;

/// Dispatches account-confirmation emails.
///
/// A send failure never rolls back a registration; the broker logs it and
/// carries on, because the account is already usable.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    /// Sends the confirmation token to the given address.
    async fn send_confirmation(&self, email: &str, token: &str) -> IdentityResult<()>;
}

/// Mailer stub: real delivery is not implemented, the token is only logged.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl ConfirmationMailer for LogMailer {
    async fn send_confirmation(&self, email: &str, token: &str) -> IdentityResult<()> {
        tracing::info!(%email, %token, "confirmation email dispatch is stubbed out");
        Ok(())
    }
}
