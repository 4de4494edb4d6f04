//! bcrypt implementation of [`PasswordHasher`].
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Work factor used for stored passwords.
pub const DEFAULT_COST: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit work factor, clamped to bcrypt's minimum.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.max(4),
        }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

fn join_error(err: &tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(err.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(|err| join_error(&err))?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(|err| join_error(&err))?;
        Ok(outcome.unwrap_or_else(|err| {
            debug!(error = %err, "stored password hash is malformed");
            false
        }))
    }
}
