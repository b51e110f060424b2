//! Wire types exchanged with the provider and the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Token set issued by the provider's token endpoint.
///
/// The field names are the OAuth2 wire names and must stay verbatim; callers
/// receive this value unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
    pub refresh_token: String,
    pub token_type: String,
    pub scope: String,
}

/// Read-only projection of a user as the admin API reports it. Not persisted.
///
/// Keycloak emits camelCase; the aliases additionally accept the lowercase
/// and PascalCase spellings seen from other deployments. Exotic casings
/// beyond those are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "Username")]
    pub username: String,
    #[serde(alias = "firstname", alias = "FirstName")]
    pub first_name: String,
    #[serde(alias = "lastname", alias = "LastName")]
    pub last_name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Enabled")]
    pub enabled: bool,
}

/// Password-grant login request. Transient, never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Refresh-grant request. Transient.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokensRequest {
    pub refresh_token: String,
}

/// Registration request; produces a local mirror record as a side effect.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_set_wire_names_round_trip() {
        let tokens = TokenSet {
            access_token: "at".to_string(),
            expires_in: 300,
            refresh_expires_in: 1800,
            refresh_token: "rt".to_string(),
            token_type: "Bearer".to_string(),
            scope: "openid email".to_string(),
        };

        let json = serde_json::to_value(&tokens).unwrap();
        for field in [
            "access_token",
            "expires_in",
            "refresh_expires_in",
            "refresh_token",
            "token_type",
            "scope",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }

        let parsed: TokenSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tokens);
    }

    #[test]
    fn test_remote_user_accepts_camel_and_lower_case() {
        let camel: RemoteUser = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "username": "a@x.com",
            "firstName": "A",
            "lastName": "B",
            "email": "a@x.com",
            "enabled": true
        }))
        .unwrap();
        assert_eq!(camel.first_name, "A");

        let lower: RemoteUser = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "username": "a@x.com",
            "firstname": "A",
            "lastname": "B",
            "email": "a@x.com",
            "enabled": false
        }))
        .unwrap();
        assert_eq!(lower.last_name, "B");
        assert!(!lower.enabled);
    }

    #[test]
    fn test_remote_user_accepts_pascal_case() {
        let pascal: RemoteUser = serde_json::from_value(serde_json::json!({
            "Id": "abc",
            "Username": "a@x.com",
            "FirstName": "A",
            "LastName": "B",
            "Email": "a@x.com",
            "Enabled": true
        }))
        .unwrap();
        assert_eq!(pascal.id, "abc");
        assert_eq!(pascal.first_name, "A");
        assert!(pascal.enabled);
    }

    #[test]
    fn test_requests_use_camel_case_wire_form() {
        let refresh: RefreshTokensRequest =
            serde_json::from_value(serde_json::json!({ "refreshToken": "rt" })).unwrap();
        assert_eq!(refresh.refresh_token, "rt");

        let register: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "a@x.com",
            "password": "p",
            "firstName": "A",
            "lastName": "B"
        }))
        .unwrap();
        assert_eq!(register.first_name, "A");
    }
}
