//! Response construction and error classification.

use axum::http::header::{HeaderValue, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::errors::{ErrorKind, JobServiceError, STATUS_NOT_FOUND};

/// Builds a plain-text response whose body is `message` plus a newline.
pub fn text_response(status: StatusCode, message: &str) -> Response {
    let mut response = (status, format!("{message}\n")).into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

/// Maps a store error of a status query to a response.
pub fn error_response(err: &JobServiceError) -> Response {
    match err.kind() {
        ErrorKind::NotFound => text_response(StatusCode::NOT_FOUND, STATUS_NOT_FOUND),
        ErrorKind::Internal => text_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}
