//! Response construction and dispatch error mapping.
//!
//! Every handler code path funnels through these helpers so each request ends
//! in exactly one status + body write. Error bodies are one-line plain text
//! ending in a newline, carrying the cause but never a backtrace.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Failures shared by every operation dispatcher, before the vault call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request body stream errored or exceeded the size cap.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The body was read but did not decode into the operation's payload.
    #[error("malformed request payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// No session cell in the request extensions: the scoping middleware did
    /// not run for this route.
    #[error("missing client in context, login error")]
    MissingSession,

    /// A session cell was present but the session was already gone.
    #[error("invalid client in context, login error")]
    InvalidSession,
}

impl DispatchError {
    fn status(&self) -> StatusCode {
        match self {
            // A payload that does not decode is the caller's fault on every
            // verb, reads included.
            DispatchError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            DispatchError::BodyRead(_)
            | DispatchError::MissingSession
            | DispatchError::InvalidSession => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        plain_error(self.status(), &self.to_string())
    }
}

/// Plain-text error response with a trailing newline.
pub fn plain_error(status: StatusCode, message: &str) -> Response {
    (status, format!("{message}\n")).into_response()
}

/// 200 JSON response, or 500 when the value fails to serialize.
pub fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => plain_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}
