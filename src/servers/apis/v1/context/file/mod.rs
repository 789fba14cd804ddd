//! API context: `file`.
//!
//! This API context serves the bytes of the files of a transfer.
//!
//! # Endpoints
//!
//! - [Stream a file](#stream-a-file)
//! - [Download a file](#download-a-file)
//!
//! # Stream a file
//!
//! `GET /stream/:info_hash/*file`
//!
//! It serves the file while it is being downloaded. `Range` requests are
//! supported, so media players can seek. The pieces after the read position
//! are fetched first, the readahead window being 1% of the file length.
//!
//! **Example request**
//!
//! ```bash
//! curl -H "Range: bytes=0-1023" "http://127.0.0.1:1010/api/stream/3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0/ubuntu.iso"
//! ```
//!
//! **Example response** `206`
//!
//! ```text
//! content-range: bytes 0-1023/82854982
//! content-length: 1024
//! ```
//!
//! An unsatisfiable range fails with `416`.
//!
//! # Download a file
//!
//! `GET /file/:info_hash/*file`
//!
//! It serves a completely downloaded file as an attachment. The attachment
//! name is the file path with its slashes replaced by ` - `.
//!
//! **Example response** `202` when the file is not complete yet
//!
//! ```json
//! {"error": "File is not completed"}
//! ```
pub mod handlers;
pub mod range;
pub mod routes;
