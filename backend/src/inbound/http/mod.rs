//! HTTP inbound adapter exposing the REST API.
//!
//! Handlers translate JSON payloads into domain commands, call the services
//! held in [`state::HttpState`] and wrap results in the shared envelopes.

pub mod auth;
pub mod bearer;
pub mod comments;
pub mod custom_objects;
pub mod envelope;
pub mod error;
pub mod health;
pub mod info;
pub mod layouts;
pub mod objects;
pub mod routes;
pub mod state;
pub mod templates;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
