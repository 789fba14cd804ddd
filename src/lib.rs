//! **Torrenttp** is an HTTP service to add `BitTorrent` transfers, choose
//! which of their files to download, and stream or download those files while
//! they arrive.
//!
//! # Table of contents
//!
//! - [Features](#features)
//! - [Services](#services)
//! - [Installation](#installation)
//! - [Configuration](#configuration)
//! - [Usage](#usage)
//! - [Components](#components)
//!
//! # Features
//!
//! - Add transfers from a magnet link, from an info-hash with trackers, or
//!   from a `.torrent` file.
//! - Select the files to download and change their priority.
//! - Stream files with `Range` support while they are being downloaded.
//! - Download complete files as attachments.
//! - Build `m3u` playlists to play a magnet link directly.
//! - Transfers and file selections survive restarts: they are stored in a
//!   `SQLite` spec store and recreated at startup.
//! - Optional shared secret authentication.
//!
//! # Services
//!
//! There is one service, the HTTP API, listening by default on port `1010`.
//! The endpoints are documented in the [API contexts](crate::servers::apis::v1::context).
//!
//! # Installation
//!
//! ```text
//! cargo build --release
//! ./target/release/torrenttp --dir ./downloads --bind :1010
//! ```
//!
//! # Configuration
//!
//! The configuration is loaded from `./share/default/config/torrenttp.toml`
//! and the environment. Refer to [`torrenttp_configuration`] for every
//! option. The command line flags override it:
//!
//! Flag | Description
//! ---|---
//! `--dir <path>` | Download directory path.
//! `--bind <addr>` | API listening address, `:1010` means every interface.
//! `--noup` | Disables uploading to other peers. The `NOUP=true` env var does the same.
//! `--auth` | Requires the API key from the `TORRENTTP_API_KEY` env var.
//!
//! # Usage
//!
//! ```text
//! curl -X POST http://127.0.0.1:1010/api/addtorrent \
//!   -H "Content-Type: application/json" \
//!   -d '{"magnet": "magnet:?xt=urn:btih:3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"}'
//! ```
//!
//! # Components
//!
//! - [`core`]: the [`Engine`](crate::core::Engine), its spec store and the
//!   transport contract.
//! - [`servers`]: the HTTP API.
//! - [`bootstrap`]: configuration, logging and the job launchers.
//! - [`app`]: starts every job.
pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;
