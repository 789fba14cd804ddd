//! Route initialization for the v1 API.
use std::sync::Arc;

use axum::Router;

use super::context::{file, play, torrent};
use crate::core::Engine;

/// Add the routes for the v1 API.
pub fn add(prefix: &str, router: Router, engine: Arc<Engine>) -> Router {
    let router = torrent::routes::add(prefix, router, engine.clone());
    let router = file::routes::add(prefix, router, engine.clone());
    play::routes::add(prefix, router, engine)
}
