//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::net::{Ipv4Addr, SocketAddr};

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use layout_backend::inbound::http::health::HealthState;
use layout_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use layout_backend::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Connect to PostgreSQL after applying the embedded migrations.
async fn connect_database(database_url: &str, settings: &AppSettings) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
    let pool_config = PoolConfig::new(database_url)
        .with_max_size(settings.database_max_connections)
        .with_checkout_timeout(settings.database_timeout());
    DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(format!("database pool setup failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;

    if settings.uses_default_jwt_secret() {
        warn!("SETUP_JWT_SECRET is not set; signing tokens with the development key");
    }

    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port()));
    let mut config = ServerConfig::new(
        bind_addr,
        settings.frontend_url(),
        settings.jwt_secret().as_bytes(),
    )
    .with_internal_errors_exposed(settings.is_development());
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url, &settings).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(
        %bind_addr,
        environment = settings.environment(),
        "server listening"
    );
    server.await
}
