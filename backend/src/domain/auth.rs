//! Authentication primitives: registration and login payloads plus the
//! identity carried by bearer tokens.
//!
//! Constructors validate raw inputs before a handler talks to a service.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;
use zeroize::Zeroizing;

use crate::domain::UserId;

/// Lifetime of issued bearer tokens, in days.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Lifetime of issued bearer tokens.
#[must_use]
pub fn token_ttl() -> Duration {
    Duration::days(TOKEN_TTL_DAYS)
}

/// Errors raised while validating credential payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("Please provide all fields")]
    IncompleteRegistration,
    #[error("Please add email and password")]
    IncompleteLogin,
    #[error("email must be a valid email address")]
    InvalidEmail,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

fn non_empty_password(value: Option<&str>) -> Option<Zeroizing<String>> {
    value
        .filter(|password| !password.is_empty())
        .map(|password| Zeroizing::new(password.to_owned()))
}

/// Validated registration request.
///
/// Username and email are trimmed; the password keeps caller whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw payload values.
    ///
    /// # Examples
    /// ```
    /// use layout_backend::domain::Registration;
    ///
    /// let registration =
    ///     Registration::try_from_parts(Some(" ada "), Some("ada@example.com"), Some("pw"))
    ///         .expect("valid registration");
    /// assert_eq!(registration.username(), "ada");
    /// ```
    pub fn try_from_parts(
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        let (Some(username), Some(email), Some(password)) = (
            non_blank(username),
            non_blank(email),
            non_empty_password(password),
        ) else {
            return Err(CredentialsValidationError::IncompleteRegistration);
        };
        if !email_regex().is_match(email) {
            return Err(CredentialsValidationError::InvalidEmail);
        }
        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            password,
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        let (Some(email), Some(password)) = (non_blank(email), non_empty_password(password))
        else {
            return Err(CredentialsValidationError::IncompleteLogin);
        };
        Ok(Self {
            email: email.to_owned(),
            password,
        })
    }

    /// Email used to look up the account.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity decoded from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub identity: AuthenticatedUser,
    pub token: String,
}
