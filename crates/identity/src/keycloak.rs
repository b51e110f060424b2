//! Keycloak HTTP client.

use async_trait::async_trait;
use reqwest::header::LOCATION;
use serde_json::json;

use crate::{
    ADMIN_CLIENT_ID, IdentityError, IdentityProvider, IdentityResult, KeycloakConfig,
    RegisterRequest, RemoteUser, TokenSet,
};

/// Client for Keycloak's token endpoint and admin REST API.
///
/// Holds a shared `reqwest::Client`; the transport is stateless and safe to
/// reuse across concurrent requests.
#[derive(Debug, Clone)]
pub struct KeycloakClient {
    http: reqwest::Client,
    config: KeycloakConfig,
}

impl KeycloakClient {
    /// Creates a client over an existing HTTP transport.
    pub fn new(http: reqwest::Client, config: KeycloakConfig) -> Self {
        Self { http, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &KeycloakConfig {
        &self.config
    }

    async fn password_grant(
        &self,
        endpoint: &str,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(endpoint)
            .form(&[
                ("client_id", client_id),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await
    }

    /// Extracts the new resource id from a `Location` header's final path
    /// segment.
    fn provider_id_from_location(location: &str) -> Option<String> {
        let url = url::Url::parse(location).ok()?;
        let id = url.path_segments()?.next_back()?;
        if id.is_empty() {
            return None;
        }
        Some(id.to_string())
    }
}

#[async_trait]
impl IdentityProvider for KeycloakClient {
    async fn login(&self, username: &str, password: &str) -> IdentityResult<TokenSet> {
        let response = self
            .password_grant(
                &self.config.token_endpoint(),
                &self.config.client_id,
                username,
                password,
            )
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await?;
            return Err(IdentityError::RemoteAuth { detail });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn refresh(&self, refresh_token: &str) -> IdentityResult<TokenSet> {
        let response = self
            .http
            .post(self.config.token_endpoint())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await?;
            return Err(IdentityError::RemoteRefresh { detail });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn acquire_admin_token(&self) -> Option<TokenSet> {
        let response = match self
            .password_grant(
                &self.config.master_token_endpoint(),
                ADMIN_CLIENT_ID,
                &self.config.admin_username,
                &self.config.admin_password,
            )
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "admin token request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "admin token request rejected");
            return None;
        }

        match response.json::<TokenSet>().await {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                tracing::warn!(error = %err, "admin token response was not parseable");
                None
            }
        }
    }

    async fn create_user(
        &self,
        admin_token: &str,
        request: &RegisterRequest,
    ) -> IdentityResult<String> {
        let payload = json!({
            "username": request.email,
            "email": request.email,
            "firstName": request.first_name,
            "lastName": request.last_name,
            "enabled": true,
            "credentials": [{
                "type": "password",
                "value": request.password,
                "temporary": false
            }]
        });

        let response = self
            .http
            .post(self.config.users_endpoint())
            .bearer_auth(admin_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await?;
            return Err(IdentityError::Remote {
                context: "Failed to register user",
                detail,
            });
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::provider_id_from_location)
            .ok_or(IdentityError::MissingLocation)
    }

    async fn list_users(&self, admin_token: &str) -> IdentityResult<Vec<RemoteUser>> {
        let response = self
            .http
            .get(self.config.users_endpoint())
            .bearer_auth(admin_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await?;
            return Err(IdentityError::Remote {
                context: "Failed to retrieve users",
                detail,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn mark_email_verified(
        &self,
        admin_token: &str,
        provider_id: &str,
    ) -> IdentityResult<()> {
        let response = self
            .http
            .put(self.config.user_endpoint(provider_id))
            .bearer_auth(admin_token)
            .json(&json!({ "emailVerified": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await?;
            return Err(IdentityError::Remote {
                context: "Failed to mark email as verified",
                detail,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_from_location() {
        assert_eq!(
            KeycloakClient::provider_id_from_location(
                "https://kc.example.com/admin/realms/app/users/abc123"
            ),
            Some("abc123".to_string())
        );
        assert_eq!(
            KeycloakClient::provider_id_from_location("not a url"),
            None
        );
    }
}
