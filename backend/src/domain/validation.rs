//! Payload shape checks shared by every router.
//!
//! Handlers receive loosely typed JSON for fields whose failure messages are
//! part of the API. These helpers turn those values into typed data or a
//! [`ValidationError`] naming the offending field (and element index for
//! arrays). Stores trust what comes out of here.

use serde_json::Value;

use crate::domain::{Vec3, WorkspaceObject};

/// Stable codes reported alongside validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    MissingField,
    EmptyString,
    NotArray,
    NotBoolean,
    MissingObjectFields,
    MalformedObject,
    TooLong,
    Malformed,
}

impl ValidationCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::EmptyString => "empty_string",
            Self::NotArray => "not_array",
            Self::NotBoolean => "not_boolean",
            Self::MissingObjectFields => "missing_object_fields",
            Self::MalformedObject => "malformed_object",
            Self::TooLong => "too_long",
            Self::Malformed => "malformed",
        }
    }
}

/// A payload failed its shape check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be a non-empty string")]
    EmptyString { field: &'static str },
    #[error("{field} must be an array")]
    NotArray { field: &'static str },
    #[error("{field} must be a boolean")]
    NotBoolean { field: &'static str },
    #[error("Object at index {index} is missing required fields (id, type, name)")]
    MissingObjectFields { field: &'static str, index: usize },
    #[error("Object at index {index} is malformed: {reason}")]
    MalformedObject {
        field: &'static str,
        index: usize,
        reason: String,
    },
    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },
}

impl ValidationError {
    /// Payload field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::EmptyString { field }
            | Self::NotArray { field }
            | Self::NotBoolean { field }
            | Self::MissingObjectFields { field, .. }
            | Self::MalformedObject { field, .. }
            | Self::TooLong { field, .. }
            | Self::Malformed { field, .. } => field,
        }
    }

    /// Zero-based array element index, for per-element failures.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MissingObjectFields { index, .. } | Self::MalformedObject { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn code(&self) -> ValidationCode {
        match self {
            Self::Missing { .. } => ValidationCode::MissingField,
            Self::EmptyString { .. } => ValidationCode::EmptyString,
            Self::NotArray { .. } => ValidationCode::NotArray,
            Self::NotBoolean { .. } => ValidationCode::NotBoolean,
            Self::MissingObjectFields { .. } => ValidationCode::MissingObjectFields,
            Self::MalformedObject { .. } => ValidationCode::MalformedObject,
            Self::TooLong { .. } => ValidationCode::TooLong,
            Self::Malformed { .. } => ValidationCode::Malformed,
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Require a string that is non-empty after trimming; returns it trimmed.
pub fn require_non_empty_string(
    field: &'static str,
    value: Option<&Value>,
) -> Result<String, ValidationError> {
    let value = present(value).ok_or(ValidationError::Missing { field })?;
    value
        .as_str()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
        .ok_or(ValidationError::EmptyString { field })
}

/// Like [`require_non_empty_string`] but absent values pass as `None`.
pub fn optional_non_empty_string(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, ValidationError> {
    present(value)
        .map(|value| require_non_empty_string(field, Some(value)))
        .transpose()
}

/// Accept any string as-is, including empty ones.
pub fn optional_string(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<String>, ValidationError> {
    present(value)
        .map(|value| {
            value
                .as_str()
                .map(str::to_owned)
                .ok_or_else(|| ValidationError::Malformed {
                    field,
                    reason: "expected a string".to_owned(),
                })
        })
        .transpose()
}

/// Require a JSON array.
pub fn require_array<'a>(
    field: &'static str,
    value: Option<&'a Value>,
) -> Result<&'a [Value], ValidationError> {
    let value = present(value).ok_or(ValidationError::Missing { field })?;
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::NotArray { field })
}

fn has_text(candidate: &Value, key: &str) -> bool {
    candidate
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty())
}

/// Check one array element against the [`WorkspaceObject`] shape.
///
/// `id`, `type` and `name` must be non-empty strings; the remaining fields
/// must deserialise when present.
pub fn require_workspace_object_shape(
    field: &'static str,
    candidate: &Value,
    index: usize,
) -> Result<WorkspaceObject, ValidationError> {
    if !["id", "type", "name"]
        .into_iter()
        .all(|key| has_text(candidate, key))
    {
        return Err(ValidationError::MissingObjectFields { field, index });
    }
    serde_json::from_value(candidate.clone()).map_err(|err| ValidationError::MalformedObject {
        field,
        index,
        reason: err.to_string(),
    })
}

/// Require an array of well-formed workspace objects.
///
/// The first offending element is reported.
pub fn require_workspace_objects(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Vec<WorkspaceObject>, ValidationError> {
    require_array(field, value)?
        .iter()
        .enumerate()
        .map(|(index, candidate)| require_workspace_object_shape(field, candidate, index))
        .collect()
}

/// Like [`require_workspace_objects`] but absent values pass as `None`.
pub fn optional_workspace_objects(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<Vec<WorkspaceObject>>, ValidationError> {
    present(value)
        .map(|value| require_workspace_objects(field, Some(value)))
        .transpose()
}

/// Require a JSON boolean.
pub fn require_bool(field: &'static str, value: Option<&Value>) -> Result<bool, ValidationError> {
    present(value)
        .ok_or(ValidationError::Missing { field })?
        .as_bool()
        .ok_or(ValidationError::NotBoolean { field })
}

/// Like [`require_bool`] but absent values pass as `None`.
pub fn optional_bool(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<bool>, ValidationError> {
    present(value)
        .map(|value| require_bool(field, Some(value)))
        .transpose()
}

/// Require trimmed, non-empty text of at most `max` characters.
pub fn require_content(
    field: &'static str,
    value: Option<&Value>,
    max: usize,
) -> Result<String, ValidationError> {
    let content = require_non_empty_string(field, value)?;
    if content.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(content)
}

/// Require a three-component numeric vector.
pub fn require_vec3(field: &'static str, value: Option<&Value>) -> Result<Vec3, ValidationError> {
    let value = present(value).ok_or(ValidationError::Missing { field })?;
    serde_json::from_value(value.clone()).map_err(|_| ValidationError::Malformed {
        field,
        reason: "expected three numbers".to_owned(),
    })
}
