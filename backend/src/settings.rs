//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SETUP_*` environment variables and config
//! files, in increasing precedence order of files, environment, flags.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
/// Development fallback; production deployments must override it.
pub const DEFAULT_JWT_SECRET: &str = "dev-secret-key";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Configuration values controlling the HTTP server and its backends.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SETUP")]
pub struct AppSettings {
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// Origin allowed by CORS.
    pub frontend_url: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Deployment environment; `development` exposes internal error causes.
    pub environment: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled PostgreSQL connections.
    pub database_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing the request.
    pub database_timeout_secs: Option<u64>,
}

impl AppSettings {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn frontend_url(&self) -> &str {
        self.frontend_url.as_deref().unwrap_or(DEFAULT_FRONTEND_URL)
    }

    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .unwrap_or(DEFAULT_JWT_SECRET)
    }

    /// True when no secret was configured and the development key is in use.
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret() == DEFAULT_JWT_SECRET
    }

    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn is_development(&self) -> bool {
        self.environment().eq_ignore_ascii_case(DEFAULT_ENVIRONMENT)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn database_timeout(&self) -> Option<Duration> {
        self.database_timeout_secs.map(Duration::from_secs)
    }
}
