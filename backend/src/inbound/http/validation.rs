//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::domain::{CredentialsValidationError, Error, UserId, ValidationError};

/// Map a payload shape failure onto a 400 with `{field, index?, code}` details.
pub(crate) fn validation_error(err: ValidationError) -> Error {
    let mut details = Map::new();
    details.insert("field".to_owned(), json!(err.field()));
    if let Some(index) = err.index() {
        details.insert("index".to_owned(), json!(index));
    }
    details.insert("code".to_owned(), json!(err.code().as_str()));
    Error::invalid_request(err.to_string()).with_details(Value::Object(details))
}

pub(crate) fn credentials_error(err: CredentialsValidationError) -> Error {
    let code = match err {
        CredentialsValidationError::IncompleteRegistration
        | CredentialsValidationError::IncompleteLogin => "missing_field",
        CredentialsValidationError::InvalidEmail => "invalid_email",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "code": code }))
}

/// Parse a path identifier; anything malformed is reported as `not_found`.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, not_found: &str) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        debug!(id = raw, "malformed identifier in path");
        Error::not_found(not_found)
    })
}

/// Parse an optional `userId` query filter.
///
/// `Ok(None)` means "no filter"; `Err(())` means the value can never match an
/// owner, so the caller answers with an empty listing.
pub(crate) fn parse_owner_filter(raw: Option<&str>) -> Result<Option<UserId>, ()> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ()),
    }
}

/// Parse an optional UUID-backed body field such as `layoutId`.
///
/// Absent and `null` give `Ok(None)`; anything else must parse.
pub(crate) fn parse_body_id<T: FromStr>(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<T>, Error> {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        return Ok(None);
    };
    value
        .as_str()
        .and_then(|raw| raw.trim().parse().ok())
        .map(Some)
        .ok_or_else(|| {
            validation_error(ValidationError::Malformed {
                field,
                reason: "expected a UUID".to_owned(),
            })
        })
}

/// Owner claimed in an anonymous request body.
///
/// Layouts accept any `userId`; values that are not user ids leave the
/// layout without an owner.
pub(crate) fn claimed_owner(value: Option<&Value>) -> Option<UserId> {
    parse_body_id("userId", value).ok().flatten()
}
