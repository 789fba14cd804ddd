//! API responses for the [`torrent`](crate::servers::apis::v1::context::torrent)
//! API context.
use axum::response::{Json, Response};

use super::resources::{AddedTorrent, PrioritizedFiles, RemovedTorrent, SelectedFiles, Torrent, TorrentList};
use crate::core::registry::SessionHandle;
use crate::core::selection::Selection;
use crate::core::services::torrent::Info;
use crate::servers::apis::v1::responses::not_found_response;

/// `200` response with the added torrent and its files.
pub fn torrent_added_response(handle: &SessionHandle) -> Json<AddedTorrent> {
    Json(AddedTorrent::from(handle))
}

/// `200` response with the selected files and their links.
pub fn files_selected_response(selection: &Selection) -> Json<SelectedFiles> {
    Json(SelectedFiles::from(selection))
}

/// `200` response with the applied priority and the files it was applied to.
pub fn priority_set_response(selection: &Selection) -> Json<PrioritizedFiles> {
    Json(PrioritizedFiles::from(selection))
}

/// `200` response with the removed torrent.
pub fn torrent_removed_response(handle: &SessionHandle) -> Json<RemovedTorrent> {
    Json(RemovedTorrent::from(handle))
}

/// `200` response with the stats of the given torrents.
pub fn torrent_list_response(infos: Vec<Info>) -> Json<TorrentList> {
    Json(TorrentList {
        torrents: infos.into_iter().map(Torrent::from).collect(),
    })
}

/// `404` response when the add request describes no torrent.
#[must_use]
pub fn no_torrent_provided_response() -> Response {
    not_found_response("No torrent provided")
}

/// `404` response when a selection names no file.
#[must_use]
pub fn no_files_provided_response() -> Response {
    not_found_response("No files provided")
}

