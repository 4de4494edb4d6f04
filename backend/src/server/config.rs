//! What the HTTP server needs to start: where to listen, which origin may
//! call it, how to sign tokens and which storage backend to use.

use std::net::SocketAddr;

use layout_backend::outbound::persistence::DbPool;
use zeroize::Zeroizing;

pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) frontend_url: String,
    /// Wiped from memory when the config is dropped after startup.
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) expose_internal_errors: bool,
    /// `None` selects the in-memory repositories.
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, frontend_url: impl Into<String>, jwt_secret: &[u8]) -> Self {
        Self {
            bind_addr,
            frontend_url: frontend_url.into(),
            jwt_secret: Zeroizing::new(jwt_secret.to_vec()),
            expose_internal_errors: false,
            db_pool: None,
        }
    }

    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Put internal error causes into `details.cause`; development only.
    #[must_use]
    pub fn with_internal_errors_exposed(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }
}
