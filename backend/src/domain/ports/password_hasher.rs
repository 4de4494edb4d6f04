//! Port for password hashing.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification could not run.
        Hashing => "password hashing failed: {message}",
    }
}

/// One-way password hashing.
///
/// Implementations are expected to be slow on purpose and must not block
/// the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Whether `password` matches `hash`. A malformed hash never matches.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
