//! idgate server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use identity::{IdentityBroker, KeycloakClient, KeycloakConfig, LogMailer};
use idgate_server::{config::Config, create_app, init_tracing, state::AppState};
use user_store::{MemoryUserStore, PgUserStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config.log_level);

    let keycloak_config = KeycloakConfig::from_env()?;
    tracing::info!(authority = %keycloak_config.authority, "Starting idgate server");

    // One shared transport for every remote call.
    let http = reqwest::Client::new();
    let provider = KeycloakClient::new(http, keycloak_config);

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url).await?;
            let store = PgUserStore::new(pool);
            store.init_schema().await?;
            run(config, provider, store).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory user store");
            run(config, provider, MemoryUserStore::new()).await
        }
    }
}

async fn run<S: UserStore + 'static>(
    config: Config,
    provider: KeycloakClient,
    store: S,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config.server_addr().parse()?;

    let broker = IdentityBroker::new(provider, store, Box::new(LogMailer));
    let state = Arc::new(AppState::new(config, broker));
    let app = create_app(state);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
