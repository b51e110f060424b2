//! User entity definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local mirror of a user held by the remote identity provider.
///
/// The remote provider is the source of truth for credentials and the
/// email-verification flag; this record tracks the pieces the provider does
/// not hold for us, most importantly the confirmation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier, generated locally.
    pub id: Uuid,
    /// Identifier assigned by the remote identity provider. Unique.
    pub provider_id: String,
    /// Username at the remote provider (the email address at registration).
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Whether the account is enabled locally.
    pub is_enabled: bool,
    /// Whether the email address has been confirmed.
    pub is_email_confirmed: bool,
    /// Single-use confirmation token. `None` once the email is confirmed.
    pub confirmation_token: Option<String>,
}

impl User {
    /// Creates a freshly registered, unconfirmed user.
    pub fn new(
        provider_id: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        confirmation_token: impl Into<String>,
    ) -> Self {
        let email = email.into();
        Self {
            id: Uuid::new_v4(),
            provider_id: provider_id.into(),
            username: email.clone(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email,
            is_enabled: true,
            is_email_confirmed: false,
            confirmation_token: Some(confirmation_token.into()),
        }
    }

    /// Sets the local enablement flag.
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.is_enabled = enabled;
        self
    }

    /// Marks the email as confirmed and consumes the confirmation token.
    ///
    /// A confirmed record never carries a token.
    pub fn confirm_email(&mut self) -> &mut Self {
        self.is_email_confirmed = true;
        self.confirmation_token = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_unconfirmed() {
        let user = User::new("abc123", "test@example.com", "Test", "User", "tok-1");

        assert_eq!(user.username, "test@example.com");
        assert!(user.is_enabled);
        assert!(!user.is_email_confirmed);
        assert_eq!(user.confirmation_token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_confirm_email_clears_token() {
        let mut user = User::new("abc123", "test@example.com", "Test", "User", "tok-1");
        user.confirm_email();

        assert!(user.is_email_confirmed);
        assert!(user.confirmation_token.is_none());
    }
}
