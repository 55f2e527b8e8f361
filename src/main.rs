//! slxmppd - Straylight XMPP Daemon

use slxmppd::config::{Config, validation};
use slxmppd::handlers::Registry;
use slxmppd::routing::LogRouter;
use slxmppd::state::{Matrix, MatrixParams, User};
use slxmppd::storage::MemoryStorage;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        server = %config.server.name,
        domains = ?config.server.domains,
        "Starting slxmppd"
    );

    slxmppd::metrics::init();

    let users = config
        .users
        .iter()
        .map(|seed| seed.to_user())
        .collect::<Result<Vec<User>, _>>()?;
    let storage = Arc::new(MemoryStorage::with_users(users));
    info!(accounts = storage.len(), "Accounts seeded");

    let matrix = Arc::new(Matrix::new(MatrixParams {
        config: &config,
        storage,
        router: Arc::new(LogRouter),
    }));
    let registry = Arc::new(Registry::new());
    for route in registry.routes() {
        info!(route = %route, "Route registered");
    }

    if let Some(port) = config.server.metrics_port {
        tokio::spawn(slxmppd::http::run_http_server(port));
    }

    info!(
        domains = matrix.server_info.domains.len(),
        "Ready for session bindings"
    );

    tokio::signal::ctrl_c().await?;
    info!(
        sessions = matrix.sessions.count(),
        "Shutdown signal received"
    );
    Ok(())
}
