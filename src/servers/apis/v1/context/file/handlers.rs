//! API handlers for the [`file`](crate::servers::apis::v1::context::file)
//! API context.
use std::io::SeekFrom;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use torrenttp_primitives::info_hash::InfoHash;
use tracing::{debug, error};

use super::range::{parse_range_header, resolve};
use crate::core::error::Error;
use crate::core::transport::TransferFile;
use crate::core::Engine;
use crate::servers::apis::v1::responses::{engine_error_response, error_response, invalid_info_hash_param_response};
use crate::servers::apis::FileParam;

/// The share of the file length the transport reads ahead of a stream.
const READAHEAD_DIVISOR: u64 = 100;

/// It handles the request to stream a file, supporting `Range` requests.
///
/// It returns:
///
/// - `200` with the whole file, or `206` with the requested range.
/// - `404` if the torrent or the file are not known.
/// - `416` if the range lies outside the file.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::file#stream-a-file)
/// for more information about this endpoint.
pub async fn stream_handler(State(engine): State<Arc<Engine>>, Path(param): Path<FileParam>, headers: HeaderMap) -> Response {
    let file = match find_file(&engine, &param) {
        Ok(file) => file,
        Err(response) => return response,
    };

    serve(file.as_ref(), &headers, None).await
}

/// It handles the request to download a completely downloaded file as an
/// attachment.
///
/// It returns:
///
/// - `200` with the file.
/// - `202` if the file is not complete yet.
/// - `404` if the torrent or the file are not known.
///
/// Refer to the [API endpoint documentation](crate::servers::apis::v1::context::file#download-a-file)
/// for more information about this endpoint.
pub async fn download_handler(State(engine): State<Arc<Engine>>, Path(param): Path<FileParam>, headers: HeaderMap) -> Response {
    let file = match find_file(&engine, &param) {
        Ok(file) => file,
        Err(response) => return response,
    };

    if !file.is_complete() {
        return engine_error_response(&Error::Unavailable { path: file.path() });
    }

    serve(file.as_ref(), &headers, Some(&attachment_name(&file.path()))).await
}

fn find_file(engine: &Engine, param: &FileParam) -> Result<Arc<dyn TransferFile>, Response> {
    let Ok(info_hash) = InfoHash::from_str(&param.info_hash) else {
        return Err(invalid_info_hash_param_response(&param.info_hash));
    };

    engine
        .get_file(&info_hash, &param.file)
        .map_err(|err| engine_error_response(&err))
}

/// The attachment name of a file: its path with the slashes replaced by
/// ` - `.
#[must_use]
pub fn attachment_name(path: &str) -> String {
    path.split('/').collect::<Vec<_>>().join(" - ")
}

async fn serve(file: &dyn TransferFile, headers: &HeaderMap, attachment: Option<&str>) -> Response {
    let total = file.length();

    let requested = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_range_header);

    let Ok(range) = resolve(requested, total) else {
        return (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{total}"))],
        )
            .into_response();
    };

    let mut reader = match file.reader(total / READAHEAD_DIVISOR) {
        Ok(reader) => reader,
        Err(err) => return engine_error_response(&err.into()),
    };

    if let Err(err) = reader.seek(SeekFrom::Start(range.start)).await {
        error!("Unable to seek `{}` to {}: {err}", file.path(), range.start);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Unable to read the file");
    }

    debug!(
        "Serving `{}` range=[{}, {}) partial={}",
        file.path(),
        range.start,
        range.end,
        range.partial
    );

    let body = Body::from_stream(ReaderStream::new(reader.take(range.len())));

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type(&file.path())));
    response_headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.len()));
    response_headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if range.partial {
        if let Ok(value) = HeaderValue::from_str(&range.content_range(total)) {
            response_headers.insert(header::CONTENT_RANGE, value);
        }
    }

    if let Some(name) = attachment {
        let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "'"));

        if let Ok(value) = HeaderValue::from_bytes(disposition.as_bytes()) {
            response_headers.insert(header::CONTENT_DISPOSITION, value);
        }
    }

    let status = if range.partial { StatusCode::PARTIAL_CONTENT } else { StatusCode::OK };

    (status, response_headers, body).into_response()
}

/// A media type guessed from the file extension.
fn content_type(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, extension)| extension.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("ts") => "video/mp2t",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        Some("srt") => "application/x-subrip",
        Some("vtt") => "text/vtt",
        Some("txt" | "nfo") => "text/plain; charset=utf-8",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
