//! API context: `torrent`.
//!
//! This API context is responsible for adding, selecting, prioritizing,
//! removing and describing transfers.
//!
//! # Endpoints
//!
//! - [Add a torrent](#add-a-torrent)
//! - [Add a torrent file](#add-a-torrent-file)
//! - [Select files](#select-files)
//! - [Set the priority of files](#set-the-priority-of-files)
//! - [Remove a torrent](#remove-a-torrent)
//! - [List torrents](#list-torrents)
//! - [Get a torrent](#get-a-torrent)
//!
//! # Add a torrent
//!
//! `POST /addtorrent`
//!
//! The body holds either a magnet link or the info-hash, display name and
//! trackers of the torrent.
//!
//! **Example request**
//!
//! ```bash
//! curl -X POST "http://127.0.0.1:1010/api/addtorrent" \
//!   -H "Content-Type: application/json" \
//!   -d '{"magnet": "magnet:?xt=urn:btih:3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0&dn=ubuntu"}'
//! ```
//!
//! ```bash
//! curl -X POST "http://127.0.0.1:1010/api/addtorrent" \
//!   -H "Content-Type: application/json" \
//!   -d '{"info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0", "display_name": "ubuntu", "trackers": ["udp://tracker.example:1337"]}'
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!   "name": "ubuntu",
//!   "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0",
//!   "total_peers": 0,
//!   "active_peers": 0,
//!   "pending_peers": 0,
//!   "half_open_peers": 0,
//!   "files": [
//!     {
//!       "file_name": "ubuntu.iso",
//!       "file_size_bytes": 82854982,
//!       "file_size_readable": "83 MB"
//!     }
//!   ]
//! }
//! ```
//!
//! The request waits until the torrent metadata is known. It fails with
//! `504` when it does not arrive in `engine.metadata_timeout` seconds, and
//! with `404` when the body has no magnet link and no info-hash and name.
//!
//! # Add a torrent file
//!
//! `POST /addtorrentfile`
//!
//! A `multipart/form-data` body with the `.torrent` file in the `torrent`
//! field. The response is the same as for [adding a torrent](#add-a-torrent).
//!
//! ```bash
//! curl -X POST "http://127.0.0.1:1010/api/addtorrentfile" -F "torrent=@ubuntu.torrent"
//! ```
//!
//! # Select files
//!
//! `POST /selectfile`
//!
//! It starts downloading the given files, or all of them, with the `normal`
//! priority. Unknown file names are skipped. The selection is persisted and
//! survives a restart.
//!
//! ```bash
//! curl -X POST "http://127.0.0.1:1010/api/selectfile" \
//!   -H "Content-Type: application/json" \
//!   -d '{"info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0", "all_files": false, "files": ["ubuntu.iso"]}'
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!   "name": "ubuntu",
//!   "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0",
//!   "files": [
//!     {
//!       "file_name": "ubuntu.iso",
//!       "stream": "/api/stream/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso",
//!       "download": "/api/file/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso"
//!     }
//!   ]
//! }
//! ```
//!
//! An empty selection fails with `404` and `{"error": "No files provided"}`.
//!
//! # Set the priority of files
//!
//! `POST /setpriority`
//!
//! Like [selecting files](#select-files) but with an explicit priority:
//! `none`, `normal`, `high` or `readahead`. An unknown priority means `none`.
//!
//! ```bash
//! curl -X POST "http://127.0.0.1:1010/api/setpriority" \
//!   -H "Content-Type: application/json" \
//!   -d '{"info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0", "all_files": true, "files": [], "priority": "high"}'
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!   "name": "ubuntu",
//!   "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0",
//!   "priority": "high",
//!   "files": [{"file_name": "ubuntu.iso"}]
//! }
//! ```
//!
//! # Remove a torrent
//!
//! `DELETE /removetorrent`
//!
//! ```bash
//! curl -X DELETE "http://127.0.0.1:1010/api/removetorrent" \
//!   -H "Content-Type: application/json" \
//!   -d '{"info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0", "remove_files": true}'
//! ```
//!
//! **Example response** `200`
//!
//! ```json
//! {"name": "ubuntu", "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"}
//! ```
//!
//! # List torrents
//!
//! `GET /torrents`
//!
//! **Example response** `200`
//!
//! ```json
//! {
//!   "torrents": [
//!     {
//!       "name": "ubuntu",
//!       "info_hash": "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0",
//!       "total_peers": 1,
//!       "active_peers": 1,
//!       "pending_peers": 0,
//!       "half_open_peers": 0,
//!       "download_speed": 2000,
//!       "download_speed_readable": "2.0 kB/s",
//!       "upload_speed": 0,
//!       "upload_speed_readable": "0 B/s",
//!       "progress": "40 MB/83 MB",
//!       "peers": [{"addr": "10.0.0.1:6881", "client": "qBittorrent 4.6"}],
//!       "files": [
//!         {
//!           "file_name": "ubuntu.iso",
//!           "file_size_bytes": 82854982,
//!           "file_size_readable": "83 MB",
//!           "downloaded_bytes": 40000000,
//!           "downloaded_readable": "40 MB",
//!           "priority": "normal",
//!           "stream": "/api/stream/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso",
//!           "download": "/api/file/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The `stream` and `download` links are only given once a byte of the file
//! has been downloaded.
//!
//! # Get a torrent
//!
//! `GET /torrents/:info_hash`
//!
//! The same response as [listing torrents](#list-torrents), with only the
//! requested torrent. Unknown torrents fail with `404`.
pub mod forms;
pub mod handlers;
pub mod resources;
pub mod responses;
pub mod routes;
