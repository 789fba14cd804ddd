//! Common responses for the API v1 shared by all the contexts.
//!
//! Errors are sent as `{"error": "<message>"}` with these status codes:
//!
//! Error | Status
//! ---|---
//! Invalid argument, invalid info-hash, undecodable body | `400`
//! Wrong or missing API key | `403`
//! Unknown transfer or file | `404`
//! File not completely downloaded | `202`
//! Metadata timeout | `504`
//! Spec store or transport failure, undecodable API key | `500`
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{debug, error};

use crate::core::error::Error;

/// The body of every error response.
#[derive(Serialize, Debug)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[must_use]
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

#[must_use]
pub fn bad_request_response(message: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

#[must_use]
pub fn not_found_response(message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, message)
}

#[must_use]
pub fn invalid_info_hash_param_response(info_hash: &str) -> Response {
    bad_request_response(&format!(
        "Invalid info-hash `{info_hash}`, expected a 40 character long hexadecimal string"
    ))
}

/// `400` response when the request body can not be decoded.
#[must_use]
pub fn invalid_body_response(reason: &str) -> Response {
    bad_request_response(&format!("JSON Decoder error: {reason}"))
}

/// It maps an engine error to its response. The full error, with the
/// location it was raised at, is only logged.
#[must_use]
pub fn engine_error_response(err: &Error) -> Response {
    match err {
        Error::InvalidArgument { message, .. } => {
            debug!("Invalid request: {err}");
            bad_request_response(message)
        }
        Error::InvalidInfoHash { value, .. } => invalid_info_hash_param_response(value),
        Error::TorrentNotFound { .. } => {
            debug!("{err}");
            not_found_response("Torrent not found")
        }
        Error::FileNotFound { .. } => {
            debug!("{err}");
            not_found_response("File not found")
        }
        Error::Unavailable { .. } => error_response(StatusCode::ACCEPTED, &err.to_string()),
        Error::DeadlineExceeded { info_hash, timeout, .. } => {
            error!("{err}");
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                &format!("The metadata of {info_hash} did not arrive within {} seconds", timeout.as_secs()),
            )
        }
        Error::Storage { .. } => {
            error!("{err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Spec store error")
        }
        Error::Transport { .. } => {
            error!("{err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Transport error")
        }
    }
}
