//! Keycloak integration for idgate.
//!
//! This crate provides:
//! - the raw Keycloak client (token grants and admin REST calls)
//! - the `IdentityBroker`, which coordinates the remote provider and the
//!   local user mirror for registration and email confirmation
//! - the confirmation mailer seam (delivery itself is a stub)

mod broker;
mod config;
mod error;
mod keycloak;
mod mailer;
mod provider;
mod types;

pub use broker::*;
pub use config::*;
pub use error::*;
pub use keycloak::*;
pub use mailer::*;
pub use provider::*;
pub use types::*;

/// Client id used for admin password grants against the master realm.
pub const ADMIN_CLIENT_ID: &str = "admin-cli";

/// Length of generated confirmation tokens.
pub const CONFIRMATION_TOKEN_LEN: usize = 32;
