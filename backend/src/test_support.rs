//! Shared helpers for integration tests in `tests/`.
//!
//! Compiled only with the `test-support` feature.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::in_memory_repositories;
use crate::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};

/// Signing secret used by [`in_memory_state`].
pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

/// bcrypt's minimum cost.
pub const FAST_BCRYPT_COST: u32 = 4;

/// Handler state over fresh in-memory stores with fast password hashing.
///
/// # Examples
/// ```
/// use layout_backend::test_support::in_memory_state;
///
/// let state = in_memory_state();
/// # let _ = state;
/// ```
pub fn in_memory_state() -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::new(HttpStatePorts {
        repositories: in_memory_repositories(&clock),
        passwords: Arc::new(BcryptPasswordHasher::with_cost(FAST_BCRYPT_COST)),
        tokens: Arc::new(JwtTokenCodec::new(TEST_JWT_SECRET)),
        clock,
    })
}
