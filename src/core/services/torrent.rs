//! Torrent domain services.
//!
//! There are two services:
//!
//! - [`get_torrent_info`]: it returns all the data about one transfer.
//! - [`get_torrents`]: it returns the same data for every transfer, ordered
//!   by info-hash.
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;

use crate::core::error::Error;
use crate::core::registry::SessionHandle;
use crate::core::throughput::Throughput;
use crate::core::transport::{PeerConnection, Stats};
use crate::core::Engine;

/// It contains all the information the engine has about a transfer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Info {
    pub info_hash: InfoHash,
    pub name: String,
    /// Peer counters and cumulative byte counters, as reported by the
    /// transport.
    pub stats: Stats,
    /// Rates computed by the last throughput sample.
    pub throughput: Throughput,
    pub length: u64,
    pub bytes_completed: u64,
    pub peers: Vec<PeerConnection>,
    pub files: Vec<FileInfo>,
}

/// One file of a transfer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileInfo {
    /// The display path, relative to the transfer root.
    pub path: String,
    pub length: u64,
    pub bytes_completed: u64,
    pub priority: Priority,
}

impl From<&SessionHandle> for Info {
    fn from(handle: &SessionHandle) -> Self {
        let session = handle.session();

        Self {
            info_hash: handle.info_hash(),
            name: session.name(),
            stats: session.stats(),
            throughput: handle.throughput(),
            length: session.length(),
            bytes_completed: session.bytes_completed(),
            peers: session.peers(),
            files: session
                .files()
                .iter()
                .map(|file| FileInfo {
                    path: file.path(),
                    length: file.length(),
                    bytes_completed: file.bytes_completed(),
                    priority: file.priority(),
                })
                .collect(),
        }
    }
}

/// It returns all the information the engine has about one transfer.
///
/// # Errors
///
/// Will return `Error::TorrentNotFound` if the transfer is not registered.
pub fn get_torrent_info(engine: &Engine, info_hash: &InfoHash) -> Result<Info, Error> {
    let handle = engine.get_torrent(info_hash)?;

    Ok(Info::from(handle.as_ref()))
}

/// It returns the information about every registered transfer.
#[must_use]
pub fn get_torrents(engine: &Engine) -> Vec<Info> {
    engine.torrents().iter().map(|handle| Info::from(handle.as_ref())).collect()
}
