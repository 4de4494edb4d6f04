//! bb8-managed pool of `diesel-async` PostgreSQL connections.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("failed to build connection pool: {0}")]
    Build(String),
    #[error("no database connection available: {0}")]
    Checkout(String),
}

/// Where to connect and how many connections to hold.
///
/// ```
/// use std::time::Duration;
/// use layout_backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://setup@localhost/layouts")
///     .with_max_size(Some(20))
///     .with_checkout_timeout(Some(Duration::from_secs(5)));
/// assert_eq!(config.max_size(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Override the pool size; `None` and zero keep the default.
    #[must_use]
    pub fn with_max_size(mut self, max_size: Option<u32>) -> Self {
        if let Some(size) = max_size.filter(|size| *size > 0) {
            self.max_size = size;
        }
        self
    }

    /// Override the checkout timeout; `None` and zero keep the default.
    #[must_use]
    pub fn with_checkout_timeout(mut self, timeout: Option<Duration>) -> Self {
        if let Some(timeout) = timeout.filter(|timeout| !timeout.is_zero()) {
            self.checkout_timeout = timeout;
        }
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }

    /// Keep a fifth of the pool warm, at least one connection.
    fn min_idle(&self) -> u32 {
        (self.max_size / 5).max(1)
    }
}

#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// # Errors
    ///
    /// [`PoolError::Build`] when bb8 rejects the configuration or the first
    /// connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle()))
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build(err.to_string()))?;
        debug!(
            max_size = config.max_size,
            timeout_secs = config.checkout_timeout.as_secs(),
            "database pool ready"
        );
        Ok(Self { inner })
    }

    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the timeout elapses first.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::Checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, DEFAULT_MAX_CONNECTIONS)]
    #[case(Some(0), DEFAULT_MAX_CONNECTIONS)]
    #[case(Some(25), 25)]
    fn pool_size_overrides(#[case] requested: Option<u32>, #[case] expected: u32) {
        let config = PoolConfig::new("postgres://localhost/layouts").with_max_size(requested);
        assert_eq!(config.max_size(), expected);
    }

    #[rstest]
    #[case(None, DEFAULT_CHECKOUT_TIMEOUT)]
    #[case(Some(Duration::ZERO), DEFAULT_CHECKOUT_TIMEOUT)]
    #[case(Some(Duration::from_secs(3)), Duration::from_secs(3))]
    fn timeout_overrides(#[case] requested: Option<Duration>, #[case] expected: Duration) {
        let config =
            PoolConfig::new("postgres://localhost/layouts").with_checkout_timeout(requested);
        assert_eq!(config.checkout_timeout(), expected);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(10, 2)]
    #[case(40, 8)]
    fn idle_floor_scales_with_size(#[case] size: u32, #[case] idle: u32) {
        let config = PoolConfig::new("postgres://localhost/layouts").with_max_size(Some(size));
        assert_eq!(config.min_idle(), idle);
    }
}
