//! Keycloak configuration.

use std::env;

use serde::{Deserialize, Serialize};

use crate::{IdentityError, IdentityResult};

/// Connection settings for the Keycloak server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeycloakConfig {
    /// Token endpoint base for the application realm.
    pub authority: String,
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Base URL of the admin REST API for the application realm.
    pub admin_link: String,
    /// Token endpoint base for the master realm (admin grants).
    pub master_authority: String,
    /// Admin username for service-level calls.
    pub admin_username: String,
    /// Admin password for service-level calls.
    pub admin_password: String,
    /// Expected token audience.
    pub audience: String,
}

impl KeycloakConfig {
    /// Loads the configuration from `IDGATE_KC_*` environment variables.
    pub fn from_env() -> IdentityResult<Self> {
        Ok(Self {
            authority: require_env("IDGATE_KC_AUTHORITY")?,
            client_id: require_env("IDGATE_KC_CLIENT_ID")?,
            client_secret: require_env("IDGATE_KC_CLIENT_SECRET")?,
            admin_link: require_env("IDGATE_KC_ADMIN_LINK")?,
            master_authority: require_env("IDGATE_KC_MASTER_AUTHORITY")?,
            admin_username: require_env("IDGATE_KC_ADMIN_USERNAME")?,
            admin_password: require_env("IDGATE_KC_ADMIN_PASSWORD")?,
            audience: require_env("IDGATE_KC_AUDIENCE")?,
        })
    }

    /// Token endpoint for the application realm.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            self.authority.trim_end_matches('/')
        )
    }

    /// Token endpoint for the master realm.
    pub fn master_token_endpoint(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            self.master_authority.trim_end_matches('/')
        )
    }

    /// Admin users collection endpoint.
    pub fn users_endpoint(&self) -> String {
        format!("{}/users", self.admin_link.trim_end_matches('/'))
    }

    /// Admin endpoint for a single user.
    pub fn user_endpoint(&self, provider_id: &str) -> String {
        format!("{}/users/{provider_id}", self.admin_link.trim_end_matches('/'))
    }
}

fn require_env(name: &'static str) -> IdentityResult<String> {
    env::var(name).map_err(|_| IdentityError::Configuration(name))
}
