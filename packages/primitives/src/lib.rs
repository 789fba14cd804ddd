//! Primitive types for [Torrenttp](https://docs.rs/torrenttp).
//!
//! This module contains the basic value types shared by the `torrenttp`
//! crate and its packages: the torrent identity ([`info_hash::InfoHash`]),
//! the per-file download intent ([`priority::Priority`]), the supported
//! persistence drivers ([`DatabaseDriver`]) and the peer-to-peer transports
//! ([`TransportDriver`]).
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod info_hash;
pub mod priority;

/// The database management system used to persist the torrent specs.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Hash, Clone, Copy, Display)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// The `Sqlite3` database driver.
    #[display("Sqlite3")]
    Sqlite3,
}

/// The peer-to-peer transport that moves the torrent data.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Hash, Clone, Copy, Display)]
#[serde(rename_all = "lowercase")]
pub enum TransportDriver {
    /// A `BitTorrent` client backed by `librqbit`.
    #[display("rqbit")]
    Rqbit,
    /// An in-process catalog of torrents, with no network traffic.
    #[display("memory")]
    Memory,
}
