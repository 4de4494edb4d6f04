//! Registration, login, token verification and profile maintenance.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, TokenCodec, UserRepository, UserRepositoryError,
};
use crate::domain::{
    AuthenticatedUser, Error, IssuedSession, LoginCredentials, NewUser, ProfileChanges,
    Registration, User, UserAccount,
};

/// Returned when the `Authorization` header is missing.
pub const NO_TOKEN: &str = "Not authorized, no token";
/// Returned when a presented token does not verify.
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already taken";
const USER_NOT_FOUND: &str = "User not found";

/// Authentication service over the user repository and credential ports.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            clock,
        }
    }

    fn map_user_error(error: UserRepositoryError) -> Error {
        match error {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::Duplicate { .. } => Error::invalid_request(USER_EXISTS),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    fn identity_of(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }

    fn issue_session(&self, user: &User) -> Result<IssuedSession, Error> {
        let identity = Self::identity_of(user);
        let token = self
            .tokens
            .issue(&identity, self.clock.utc())
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(IssuedSession { identity, token })
    }

    /// Create an account and sign a token for it.
    pub async fn register(&self, registration: Registration) -> Result<IssuedSession, Error> {
        let email_taken = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(Self::map_user_error)?
            .is_some();
        let username_taken = self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(Self::map_user_error)?
            .is_some();
        if email_taken || username_taken {
            return Err(Error::invalid_request(USER_EXISTS));
        }

        let password_hash = self
            .passwords
            .hash(registration.password())
            .await
            .map_err(Self::map_hash_error)?;
        let account = self
            .users
            .create(NewUser {
                username: registration.username().to_owned(),
                email: registration.email().to_owned(),
                password_hash,
            })
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %account.user.id, "user registered");
        self.issue_session(&account.user)
    }

    /// Check credentials and sign a token.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error> {
        let Some(UserAccount {
            user,
            password_hash,
        }) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            debug!("login attempted for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .passwords
            .verify(credentials.password(), &password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !matches {
            debug!(user_id = %user.id, "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        self.issue_session(&user)
    }

    /// Decode a bearer token into the identity it carries.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(TOKEN_FAILED)
        })
    }

    /// Current profile of the token holder.
    pub async fn current_user(&self, caller: &AuthenticatedUser) -> Result<User, Error> {
        self.users
            .find_by_id(&caller.id)
            .await
            .map_err(Self::map_user_error)?
            .map(|account| account.user)
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Update username, bio or avatar of the token holder.
    ///
    /// A new username must not belong to another account.
    pub async fn update_profile(
        &self,
        caller: &AuthenticatedUser,
        changes: ProfileChanges,
    ) -> Result<User, Error> {
        if let Some(username) = changes.username.as_deref() {
            let holder = self
                .users
                .find_by_username(username)
                .await
                .map_err(Self::map_user_error)?;
            if holder.is_some_and(|account| account.user.id != caller.id) {
                return Err(Error::invalid_request(USERNAME_TAKEN));
            }
        }

        self.users
            .update_profile(&caller.id, changes)
            .await
            .map_err(|err| match err {
                UserRepositoryError::Duplicate { .. } => Error::invalid_request(USERNAME_TAKEN),
                other => Self::map_user_error(other),
            })?
            .map(|account| account.user)
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
