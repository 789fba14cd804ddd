//! API handlers for the [`play`](crate::servers::apis::v1::context::play)
//! API context.
use std::fmt::Write;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Query;
use serde::Deserialize;
use torrenttp_primitives::info_hash::InfoHash;
use tracing::debug;

use crate::core::{metainfo, Engine, Persist};
use crate::servers::apis::routes::API_URL_PREFIX;
use crate::servers::apis::v1::middlewares::auth::presented_key;
use crate::servers::apis::v1::resources::stream_link;
use crate::servers::apis::v1::responses::{engine_error_response, error_response};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The query of a play request. `tr` and `file` can be repeated.
#[derive(Deserialize, Debug, Default)]
pub struct PlayQuery {
    #[serde(default)]
    pub magnet: String,
    #[serde(default)]
    pub dn: String,
    #[serde(default)]
    pub tr: Vec<String>,
    #[serde(default)]
    pub file: Vec<String>,
}

/// It handles the request to play a magnet link.
///
/// It returns:
///
/// - `200` with the `m3u` playlist as an attachment named `<info_hash>.m3u`.
/// - `400` if the magnet link is missing or not valid.
/// - `504` if the torrent metadata does not arrive in time.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::play#play-a-magnet-link)
/// for more information about this endpoint.
pub async fn play_handler(State(engine): State<Arc<Engine>>, Query(query): Query<PlayQuery>, headers: HeaderMap, uri: Uri) -> Response {
    if query.magnet.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Invalid magnet link");
    }

    let mut descriptor = match metainfo::from_magnet(&query.magnet) {
        Ok(descriptor) => descriptor,
        Err(err) => return engine_error_response(&err.into()),
    };

    if !query.dn.is_empty() {
        descriptor.display_name.clone_from(&query.dn);
    }

    let trackers: Vec<String> = query.tr.iter().filter(|tracker| !tracker.is_empty()).cloned().collect();
    if !trackers.is_empty() {
        descriptor.trackers = trackers.into_iter().map(|tracker| vec![tracker]).collect();
    }

    let handle = match engine.add_torrent(descriptor, Persist::Save).await {
        Ok(handle) => handle,
        Err(err) => return engine_error_response(&err),
    };

    let all_files = query.file.is_empty();

    let selection = match engine.select_files(&handle.info_hash(), all_files, &query.file).await {
        Ok(selection) => selection,
        Err(err) => return engine_error_response(&err),
    };

    let origin = format!("{}://{}", scheme(&headers), host(&headers));
    let key = presented_key(&uri);

    let paths: Vec<String> = selection.files.iter().map(|file| file.path()).collect();

    debug!("Playlist for {} with {} files", handle.info_hash(), paths.len());

    let playlist = playlist(&origin, key, &handle.info_hash(), &paths);

    (
        [
            (header::CONTENT_TYPE, "audio/x-mpegurl".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.m3u\"", handle.info_hash()),
            ),
        ],
        playlist,
    )
        .into_response()
}

fn scheme(headers: &HeaderMap) -> &str {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("http")
}

fn host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
}

/// Builds an extended `m3u` playlist with one stream link per path.
#[must_use]
pub fn playlist(origin: &str, key: Option<&str>, info_hash: &InfoHash, paths: &[String]) -> String {
    let mut playlist = String::from("#EXTM3U\n");

    for path in paths {
        let link = stream_link(info_hash, path);

        let link = match key {
            Some(key) => link.replacen(API_URL_PREFIX, &format!("{API_URL_PREFIX}/key/{key}"), 1),
            None => link,
        };

        let _ = writeln!(playlist, "#EXTINF:-1,{path}\n{origin}{link}");
    }

    playlist
}
