//! API routes for the [`play`](crate::servers::apis::v1::context::play) API context.
//!
//! - `GET /play`
//!
//! Refer to the [API endpoint documentation](crate::servers::apis::v1::context::play).
use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::handlers::play_handler;
use crate::core::Engine;

/// It adds the routes to the router for the [`play`](crate::servers::apis::v1::context::play) API context.
pub fn add(prefix: &str, router: Router, engine: Arc<Engine>) -> Router {
    router.route(&format!("{prefix}/play"), get(play_handler).with_state(engine))
}
