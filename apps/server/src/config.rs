//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
///
/// Keycloak settings live in `identity::KeycloakConfig` and are loaded
/// separately.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL. When absent the in-memory store is used.
    pub database_url: Option<String>,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("IDGATE_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("IDGATE_SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok(),
            log_level: env::var("IDGATE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("IDGATE_SERVER_HOST");
            env::remove_var("IDGATE_SERVER_PORT");
        }

        let config = Config::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}
