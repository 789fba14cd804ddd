//! API routes for the [`torrent`](crate::servers::apis::v1::context::torrent) API context.
//!
//! - `POST /addtorrent`
//! - `POST /addtorrentfile`
//! - `POST /selectfile`
//! - `POST /setpriority`
//! - `DELETE /removetorrent`
//! - `GET /torrents`
//! - `GET /torrents/:info_hash`
//!
//! Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent).
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{
    add_torrent_file_handler, add_torrent_handler, get_torrent_handler, get_torrents_handler, remove_torrent_handler,
    select_file_handler, set_priority_handler,
};
use crate::core::Engine;

/// It adds the routes to the router for the [`torrent`](crate::servers::apis::v1::context::torrent) API context.
pub fn add(prefix: &str, router: Router, engine: Arc<Engine>) -> Router {
    router
        .route(
            &format!("{prefix}/addtorrent"),
            post(add_torrent_handler).with_state(engine.clone()),
        )
        .route(
            &format!("{prefix}/addtorrentfile"),
            post(add_torrent_file_handler).with_state(engine.clone()),
        )
        .route(
            &format!("{prefix}/selectfile"),
            post(select_file_handler).with_state(engine.clone()),
        )
        .route(
            &format!("{prefix}/setpriority"),
            post(set_priority_handler).with_state(engine.clone()),
        )
        .route(
            &format!("{prefix}/removetorrent"),
            delete(remove_torrent_handler).with_state(engine.clone()),
        )
        .route(&format!("{prefix}/torrents"), get(get_torrents_handler).with_state(engine.clone()))
        .route(
            &format!("{prefix}/torrents/:info_hash"),
            get(get_torrent_handler).with_state(engine),
        )
}
