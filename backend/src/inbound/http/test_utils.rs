//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{self, HeaderName};
use chrono::Utc;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::TokenCodec;
use crate::domain::{AuthenticatedUser, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::in_memory_repositories;
use crate::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};

/// Signing secret shared by [`test_state`] and [`issue_token`].
pub const TEST_SECRET: &[u8] = b"http-test-secret";

/// bcrypt's minimum cost keeps hashing fast in tests.
const TEST_BCRYPT_COST: u32 = 4;

/// Handler state over fresh in-memory stores.
pub fn test_state() -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::new(HttpStatePorts {
        repositories: in_memory_repositories(&clock),
        passwords: Arc::new(BcryptPasswordHasher::with_cost(TEST_BCRYPT_COST)),
        tokens: Arc::new(JwtTokenCodec::new(TEST_SECRET)),
        clock,
    })
}

/// Sign a token for a throwaway identity named `username`.
pub fn issue_token(username: &str) -> String {
    let identity = AuthenticatedUser {
        id: UserId::random(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
    };
    JwtTokenCodec::new(TEST_SECRET)
        .issue(&identity, Utc::now())
        .expect("test token issues")
}

/// `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
