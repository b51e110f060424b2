//! Application state.

use std::sync::Arc;

use identity::{IdentityBroker, IdentityProvider};
use user_store::UserStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<P: IdentityProvider, S: UserStore> {
    /// Server configuration.
    pub config: Config,
    /// Identity broker.
    pub broker: IdentityBroker<P, S>,
}

impl<P: IdentityProvider, S: UserStore> AppState<P, S> {
    /// Creates new application state.
    pub fn new(config: Config, broker: IdentityBroker<P, S>) -> Self {
        Self { config, broker }
    }
}

/// Type alias for shared state.
pub type SharedState<P, S> = Arc<AppState<P, S>>;
