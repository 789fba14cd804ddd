//! The HTTP API.
//!
//! It exposes the [`Engine`](crate::core::Engine) to HTTP clients: adding
//! transfers, selecting their files, streaming and downloading the files
//! and reading transfer stats.
//!
//! # Table of contents
//!
//! - [Configuration](#configuration)
//! - [Authentication](#authentication)
//! - [Endpoints](#endpoints)
//! - [Errors](#errors)
//!
//! # Configuration
//!
//! ```toml
//! [http_api]
//! bind_address = "0.0.0.0:1010"
//!
//! [http_api.auth]
//! enabled = true
//! key = "MyApiKey"
//! ```
//!
//! The key can also be given with the `TORRENTTP_API_KEY` environment
//! variable.
//!
//! # Authentication
//!
//! When enabled, every endpoint but the health check requires the key,
//! either as a query parameter:
//!
//! ```text
//! http://127.0.0.1:1010/api/torrents?key=MyApiKey
//! ```
//!
//! or as a path prefix:
//!
//! ```text
//! http://127.0.0.1:1010/api/key/MyApiKey/torrents
//! ```
//!
//! The second form is handy for media players that drop query parameters.
//! See [`middlewares::auth`](crate::servers::apis::v1::middlewares::auth).
//!
//! # Endpoints
//!
//! Endpoints are grouped by context:
//!
//! - [Torrent](crate::servers::apis::v1::context::torrent)
//! - [File](crate::servers::apis::v1::context::file)
//! - [Play](crate::servers::apis::v1::context::play)
//! - [Health check](crate::servers::apis::v1::context::health_check)
//!
//! # Errors
//!
//! Errors are JSON objects with one `error` field:
//!
//! ```json
//! {"error": "Torrent not found"}
//! ```
//!
//! See [`responses`](crate::servers::apis::v1::responses) for the status
//! codes.
pub mod routes;
pub mod server;
pub mod v1;

use serde::Deserialize;

/// The info hash URL path parameter.
///
/// For example: `http://localhost:1010/api/torrents/{info_hash}`.
///
/// It does not include validation as this is done by the API endpoint handler,
/// in order to provide a more specific error message.
#[derive(Deserialize)]
pub struct InfoHashParam {
    pub info_hash: String,
}

/// The info hash and file path URL path parameters.
///
/// For example: `http://localhost:1010/api/stream/{info_hash}/{file}`. The
/// file path may contain slashes.
#[derive(Deserialize)]
pub struct FileParam {
    pub info_hash: String,
    pub file: String,
}
