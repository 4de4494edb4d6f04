//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{NewUser, ProfileChanges, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "user repository query failed: {message}",
        /// A unique username or email is already taken.
        Duplicate =>
            "user already exists: {message}",
    }
}

/// Storage for user accounts including their password hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Exact, case-sensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Exact, case-sensitive username lookup.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Insert an account.
    ///
    /// Fails with [`UserRepositoryError::Duplicate`] when the username or
    /// email already belongs to another account.
    async fn create(&self, user: NewUser) -> Result<UserAccount, UserRepositoryError>;

    /// Apply profile changes; `None` when the account does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;
}
