//! API handlers for the [`torrent`](crate::servers::apis::v1::context::torrent)
//! API context.
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;
use tracing::{debug, warn};

use super::forms::{AddTorrentForm, RemoveTorrentForm, SelectFileForm, SetPriorityForm};
use super::responses::{
    files_selected_response, no_files_provided_response, no_torrent_provided_response, priority_set_response,
    torrent_added_response, torrent_list_response, torrent_removed_response,
};
use crate::core::descriptor::TransferDescriptor;
use crate::core::services::torrent::{get_torrent_info, get_torrents};
use crate::core::{metainfo, Engine, Persist};
use crate::servers::apis::v1::responses::{
    bad_request_response, engine_error_response, invalid_body_response, invalid_info_hash_param_response,
};
use crate::servers::apis::InfoHashParam;

/// The multipart field holding the `.torrent` file.
const TORRENT_FILE_FIELD: &str = "torrent";

/// It handles the request to add a torrent from a magnet link or from its
/// info-hash, display name and trackers.
///
/// It returns:
///
/// - `200` response with a json [`AddedTorrent`](crate::servers::apis::v1::context::torrent::resources::AddedTorrent).
/// - `404` if the body describes no torrent.
/// - `400` if the magnet link or the info-hash are not valid.
/// - `504` if the torrent metadata does not arrive in time.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#add-a-torrent)
/// for more information about this endpoint.
pub async fn add_torrent_handler(State(engine): State<Arc<Engine>>, payload: Result<Json<AddTorrentForm>, JsonRejection>) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => return invalid_body_response(&rejection.body_text()),
    };

    let descriptor = if !form.magnet.is_empty() {
        match metainfo::from_magnet(&form.magnet) {
            Ok(descriptor) => descriptor,
            Err(err) => return engine_error_response(&err.into()),
        }
    } else if !form.info_hash.is_empty() && !form.display_name.is_empty() {
        match metainfo::from_parts(&form.info_hash, &form.display_name, &form.trackers) {
            Ok(descriptor) => descriptor,
            Err(err) => return engine_error_response(&err),
        }
    } else {
        return no_torrent_provided_response();
    };

    add(&engine, descriptor).await
}

/// It handles the upload of a `.torrent` file, in the `torrent` field of a
/// multipart form.
///
/// It returns the same responses as [`add_torrent_handler`], and `400` if
/// the form has no `torrent` field or the file is not a valid torrent.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#add-a-torrent-file)
/// for more information about this endpoint.
pub async fn add_torrent_file_handler(State(engine): State<Arc<Engine>>, mut multipart: Multipart) -> Response {
    let content = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(TORRENT_FILE_FIELD) => match field.bytes().await {
                Ok(content) => break content,
                Err(err) => return bad_request_response(&err.body_text()),
            },
            Ok(Some(_)) => {}
            Ok(None) => return bad_request_response("No torrent file provided"),
            Err(err) => return bad_request_response(&err.body_text()),
        }
    };

    match metainfo::from_torrent_file(&content) {
        Ok(descriptor) => add(&engine, descriptor).await,
        Err(err) => engine_error_response(&err.into()),
    }
}

async fn add(engine: &Engine, descriptor: TransferDescriptor) -> Response {
    match engine.add_torrent(descriptor, Persist::Save).await {
        Ok(handle) => torrent_added_response(&handle).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

/// It handles the request to start downloading some files, or all of them.
///
/// It returns:
///
/// - `200` response with a json [`SelectedFiles`](crate::servers::apis::v1::context::torrent::resources::SelectedFiles).
/// - `404` if no file is given or the torrent is not known.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#select-files)
/// for more information about this endpoint.
pub async fn select_file_handler(State(engine): State<Arc<Engine>>, payload: Result<Json<SelectFileForm>, JsonRejection>) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => return invalid_body_response(&rejection.body_text()),
    };

    if !form.all_files && form.files.is_empty() {
        return no_files_provided_response();
    }

    let Ok(info_hash) = InfoHash::from_str(&form.info_hash) else {
        return invalid_info_hash_param_response(&form.info_hash);
    };

    match engine.select_files(&info_hash, form.all_files, &form.files).await {
        Ok(selection) => files_selected_response(&selection).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

/// It handles the request to set the download priority of some files, or
/// all of them. An unknown priority name means `none`.
///
/// It returns:
///
/// - `200` response with a json [`PrioritizedFiles`](crate::servers::apis::v1::context::torrent::resources::PrioritizedFiles).
/// - `404` if no file is given or the torrent is not known.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#set-the-priority-of-files)
/// for more information about this endpoint.
pub async fn set_priority_handler(State(engine): State<Arc<Engine>>, payload: Result<Json<SetPriorityForm>, JsonRejection>) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => return invalid_body_response(&rejection.body_text()),
    };

    if !form.all_files && form.files.is_empty() {
        return no_files_provided_response();
    }

    let Ok(info_hash) = InfoHash::from_str(&form.info_hash) else {
        return invalid_info_hash_param_response(&form.info_hash);
    };

    let priority = Priority::parse(&form.priority).unwrap_or_else(|| {
        warn!("Unknown priority `{}` for {info_hash}, using `none`", form.priority);
        Priority::None
    });

    match engine.set_priority(&info_hash, form.all_files, &form.files, priority).await {
        Ok(selection) => priority_set_response(&selection).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

/// It handles the request to remove a torrent, and optionally its
/// downloaded data.
///
/// It returns:
///
/// - `200` response with a json [`RemovedTorrent`](crate::servers::apis::v1::context::torrent::resources::RemovedTorrent).
/// - `404` if the torrent is not known.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#remove-a-torrent)
/// for more information about this endpoint.
pub async fn remove_torrent_handler(
    State(engine): State<Arc<Engine>>,
    payload: Result<Json<RemoveTorrentForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => return invalid_body_response(&rejection.body_text()),
    };

    let Ok(info_hash) = InfoHash::from_str(&form.info_hash) else {
        return invalid_info_hash_param_response(&form.info_hash);
    };

    match engine.remove_torrent(&info_hash, form.remove_files).await {
        Ok(handle) => torrent_removed_response(&handle).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

/// It handles the request to get the stats of every torrent.
///
/// It returns a `200` response with a json [`TorrentList`](crate::servers::apis::v1::context::torrent::resources::TorrentList).
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#list-torrents)
/// for more information about this endpoint.
pub async fn get_torrents_handler(State(engine): State<Arc<Engine>>) -> Response {
    torrent_list_response(get_torrents(&engine)).into_response()
}

/// It handles the request to get the stats of one torrent.
///
/// It returns:
///
/// - `200` response with a json [`TorrentList`](crate::servers::apis::v1::context::torrent::resources::TorrentList)
///   holding only that torrent.
/// - `400` if the info-hash is not valid.
/// - `404` if the torrent is not known.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::torrent#get-a-torrent)
/// for more information about this endpoint.
pub async fn get_torrent_handler(State(engine): State<Arc<Engine>>, Path(param): Path<InfoHashParam>) -> Response {
    let Ok(info_hash) = InfoHash::from_str(&param.info_hash) else {
        return invalid_info_hash_param_response(&param.info_hash);
    };

    debug!("Stats of {info_hash} requested");

    match get_torrent_info(&engine, &info_hash) {
        Ok(info) => torrent_list_response(vec![info]).into_response(),
        Err(err) => engine_error_response(&err),
    }
}
