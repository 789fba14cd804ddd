//! API context: `play`.
//!
//! This API context turns a magnet link into a playlist a media player can
//! open directly.
//!
//! # Endpoints
//!
//! - [Play a magnet link](#play-a-magnet-link)
//!
//! # Play a magnet link
//!
//! `GET /play?magnet=<magnet>&dn=<name>&tr=<tracker>&file=<path>`
//!
//! It adds the torrent, starts downloading the files and returns an `m3u`
//! playlist with one stream link per file.
//!
//! **Query parameters**
//!
//! Parameter | Description
//! ---|---
//! `magnet` | The magnet link. Required.
//! `dn` | Replaces the display name of the magnet link.
//! `tr` | Repeated. Replaces the trackers of the magnet link.
//! `file` | Repeated. The files to play. Every file is played when none is given.
//!
//! The links use the `Host` header of the request and the scheme in the
//! `X-Forwarded-Proto` header, `http` by default. When the request carries
//! the API key in the path prefix the links carry it too.
//!
//! **Example request**
//!
//! ```bash
//! curl "http://127.0.0.1:1010/api/play?magnet=magnet%3A%3Fxt%3Durn%3Abtih%3A3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"
//! ```
//!
//! **Example response** `200`
//!
//! ```text
//! #EXTM3U
//! #EXTINF:-1,ubuntu.iso
//! http://127.0.0.1:1010/api/stream/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso
//! ```
//!
//! A request without magnet link fails with `400` and
//! `{"error": "Invalid magnet link"}`.
pub mod handlers;
pub mod routes;
