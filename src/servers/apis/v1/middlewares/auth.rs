//! Authentication middleware for the API.
//!
//! It reads the API key from the `key` query parameter:
//!
//! `http://<host>:<port>/api/<endpoint>?key=<key>`
//!
//! or from the key path prefix:
//!
//! `http://<host>:<port>/api/key/<key>/<endpoint>`
//!
//! The path prefix wins when both are given. The raw value is handed to the
//! [`Gate`], which percent-decodes it before comparing.
//!
//! Responses:
//!
//! - `403` when the key is missing or does not match.
//! - `500` when the key can not be percent-decoded.
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::core::auth::{Error, Gate};
use crate::servers::apis::routes::API_URL_PREFIX;
use crate::servers::apis::v1::responses::error_response;

/// Middleware for authentication using the API key.
pub async fn auth(State(gate): State<Arc<Gate>>, request: Request, next: Next) -> Response {
    let presented = presented_key(request.uri());

    match gate.check(presented) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            debug!(target: "API", "Rejected request to {}: {err}", request.uri().path());
            auth_error_response(&err)
        }
    }
}

/// The raw key, still percent-encoded, as found in the URI.
pub fn presented_key(uri: &Uri) -> Option<&str> {
    let in_path = uri
        .path()
        .strip_prefix(API_URL_PREFIX)
        .and_then(|rest| rest.strip_prefix("/key/"))
        .and_then(|rest| rest.split('/').next());

    in_path.or_else(|| {
        uri.query()?
            .split('&')
            .find_map(|pair| pair.strip_prefix("key="))
    })
}

#[must_use]
pub fn auth_error_response(err: &Error) -> Response {
    match err {
        Error::MissingKey { .. } | Error::KeyMismatch { .. } => error_response(StatusCode::FORBIDDEN, "Key is not valid"),
        Error::UndecodableKey { .. } => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error unescaping the API key"),
    }
}
