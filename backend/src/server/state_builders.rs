//! Builders for the HTTP state ports.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use layout_backend::domain::ports::Repositories;
use layout_backend::inbound::http::state::{HttpState, HttpStatePorts};
use layout_backend::outbound::memory::in_memory_repositories;
use layout_backend::outbound::persistence::diesel_repositories;
use layout_backend::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Pick Diesel repositories when a pool is configured, in-memory otherwise.
fn build_repositories(config: &ServerConfig, clock: &Arc<dyn Clock>) -> Repositories {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_repositories(pool, clock)
        }
        None => {
            info!("no database configured; using in-memory repositories");
            in_memory_repositories(clock)
        }
    }
}

pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::new(HttpStatePorts {
        repositories: build_repositories(config, &clock),
        passwords: Arc::new(BcryptPasswordHasher::default()),
        tokens: Arc::new(JwtTokenCodec::new(&config.jwt_secret)),
        clock,
    })
}
