//! API routes for the [`file`](crate::servers::apis::v1::context::file) API context.
//!
//! - `GET /stream/:info_hash/*file`
//! - `GET /file/:info_hash/*file`
//!
//! Refer to the [API endpoint documentation](crate::servers::apis::v1::context::file).
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::handlers::{download_handler, stream_handler};
use crate::core::Engine;

/// It adds the routes to the router for the [`file`](crate::servers::apis::v1::context::file) API context.
pub fn add(prefix: &str, router: Router, engine: Arc<Engine>) -> Router {
    router
        .route(
            &format!("{prefix}/stream/:info_hash/*file"),
            get(stream_handler).with_state(engine.clone()),
        )
        .route(
            &format!("{prefix}/file/:info_hash/*file"),
            get(download_handler).with_state(engine),
        )
}
