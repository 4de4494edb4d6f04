//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `{ success: false, error, code }`
//! envelope and a matching status code.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

static EXPOSE_INTERNAL: AtomicBool = AtomicBool::new(false);

/// Include the original message of redacted errors in `details.cause`.
///
/// Enabled by the server in the `development` environment only.
pub fn expose_internal_errors(enabled: bool) {
    EXPOSE_INTERNAL.store(enabled, Ordering::Relaxed);
}

fn internal_errors_exposed() -> bool {
    EXPOSE_INTERNAL.load(Ordering::Relaxed)
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable message.
    #[schema(example = "Layout not found")]
    pub error: String,
    /// Stable machine-readable error code.
    pub code: ErrorCode,
    /// Correlation identifier echoed in the `trace-id` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redacted_message(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::InternalError => Some(INTERNAL_MESSAGE),
        ErrorCode::ServiceUnavailable => Some(UNAVAILABLE_MESSAGE),
        _ => None,
    }
}

/// Build the client-facing envelope for `error`.
///
/// Internal and unavailable errors get a generic message; their original
/// message survives only as `details.cause` when `expose_internal` is set.
pub(crate) fn envelope_for(error: &Error, expose_internal: bool) -> ErrorEnvelope {
    let (message, details) = match redacted_message(error.code()) {
        Some(generic) => {
            let details = expose_internal.then(|| json!({ "cause": error.message() }));
            (generic.to_owned(), details)
        }
        None => (error.message().to_owned(), error.details().cloned()),
    };
    ErrorEnvelope {
        success: false,
        error: message,
        code: error.code(),
        trace_id: error.trace_id().map(str::to_owned),
        details,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if redacted_message(self.code()).is_some() {
            error!(
                code = self.code().as_str(),
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(envelope_for(self, internal_errors_exposed()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(err.to_string())
    }
}
