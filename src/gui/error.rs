//! Mapping of library errors to HTTP responses.
//!
//! Account routes answer with plain text, project and task routes with a
//! `{"error": ...}` body. Both use the same status codes.

use crate::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// HTTP status for an error.
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Io(_)
        | Error::Json(_)
        | Error::Corrupt { .. }
        | Error::Config(_)
        | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_if_server_error(status: StatusCode, err: &Error) {
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
}

/// Error rendered as a plain-text body.
#[derive(Debug)]
pub struct TextError(pub Error);

impl From<Error> for TextError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for TextError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_if_server_error(status, &self.0);
        (status, self.0.to_string()).into_response()
    }
}

/// Error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct JsonError(pub Error);

impl From<Error> for JsonError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        log_if_server_error(status, &self.0);
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
