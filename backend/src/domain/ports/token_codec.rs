//! Port for bearer token issuance and verification.

use chrono::{DateTime, Utc};

use crate::domain::AuthenticatedUser;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codecs.
    pub enum TokenError {
        /// The token is malformed, expired or signed with another key.
        Invalid => "token rejected: {message}",
        /// The token could not be produced.
        Issue => "token issuance failed: {message}",
    }
}

/// Signs and verifies bearer tokens carrying a user's identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `identity`, valid from `issued_at` for the token TTL.
    fn issue(
        &self,
        identity: &AuthenticatedUser,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError>;

    /// Decode a token, checking signature and expiry.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
