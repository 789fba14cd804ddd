//! API resources for the [`torrent`](crate::servers::apis::v1::context::torrent)
//! API context.
//!
//! - `AddedTorrent`: a torrent just added, with its files.
//! - `SelectedFiles`: the files a selection was applied to, with their links.
//! - `PrioritizedFiles`: the files a priority was applied to.
//! - `RemovedTorrent`: the name and info-hash of a removed torrent.
//! - `TorrentList` and `Torrent`: the stats of the registered torrents.
use serde::{Deserialize, Serialize};

use crate::core::registry::SessionHandle;
use crate::core::selection::Selection;
use crate::core::services::torrent::{FileInfo, Info};
use crate::core::transport::PeerConnection;
use crate::servers::apis::v1::resources::{
    download_link, readable_bytes, readable_progress, readable_rate, stream_link,
};

/// The client name shown for peers that did not announce one.
pub const UNKNOWN_PEER_CLIENT: &str = "NOTPROVIDED";

/// `AddedTorrent` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AddedTorrent {
    pub name: String,
    pub info_hash: String,
    pub total_peers: u64,
    pub active_peers: u64,
    pub pending_peers: u64,
    pub half_open_peers: u64,
    pub files: Vec<AddedFile>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AddedFile {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub file_size_readable: String,
}

impl From<&SessionHandle> for AddedTorrent {
    fn from(handle: &SessionHandle) -> Self {
        let session = handle.session();
        let stats = session.stats();

        Self {
            name: session.name(),
            info_hash: handle.info_hash().to_string(),
            total_peers: stats.peers_total,
            active_peers: stats.peers_active,
            pending_peers: stats.peers_pending,
            half_open_peers: stats.peers_half_open,
            files: session
                .files()
                .iter()
                .map(|file| AddedFile {
                    file_name: file.path(),
                    file_size_bytes: file.length(),
                    file_size_readable: readable_bytes(file.length()),
                })
                .collect(),
        }
    }
}

/// `SelectedFiles` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SelectedFiles {
    pub name: String,
    pub info_hash: String,
    pub files: Vec<FileLinks>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct FileLinks {
    pub file_name: String,
    pub stream: String,
    pub download: String,
}

impl From<&Selection> for SelectedFiles {
    fn from(selection: &Selection) -> Self {
        let info_hash = selection.handle.info_hash();

        Self {
            name: selection.handle.session().name(),
            info_hash: info_hash.to_string(),
            files: selection
                .files
                .iter()
                .map(|file| {
                    let path = file.path();

                    FileLinks {
                        stream: stream_link(&info_hash, &path),
                        download: download_link(&info_hash, &path),
                        file_name: path,
                    }
                })
                .collect(),
        }
    }
}

/// `PrioritizedFiles` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PrioritizedFiles {
    pub name: String,
    pub info_hash: String,
    /// The priority applied, `none` when the requested one was unknown.
    pub priority: String,
    pub files: Vec<FileName>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct FileName {
    pub file_name: String,
}

impl From<&Selection> for PrioritizedFiles {
    fn from(selection: &Selection) -> Self {
        Self {
            name: selection.handle.session().name(),
            info_hash: selection.handle.info_hash().to_string(),
            priority: selection.priority.to_string(),
            files: selection.files.iter().map(|file| FileName { file_name: file.path() }).collect(),
        }
    }
}

/// `RemovedTorrent` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RemovedTorrent {
    pub name: String,
    pub info_hash: String,
}

impl From<&SessionHandle> for RemovedTorrent {
    fn from(handle: &SessionHandle) -> Self {
        Self {
            name: handle.session().name(),
            info_hash: handle.info_hash().to_string(),
        }
    }
}

/// `TorrentList` API resource. It wraps the stats of one or more torrents.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TorrentList {
    pub torrents: Vec<Torrent>,
}

/// `Torrent` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Torrent {
    pub name: String,
    pub info_hash: String,
    pub total_peers: u64,
    pub active_peers: u64,
    pub pending_peers: u64,
    pub half_open_peers: u64,
    /// Bytes per second over the last sampling interval.
    pub download_speed: u64,
    pub download_speed_readable: String,
    pub upload_speed: u64,
    pub upload_speed_readable: String,
    /// Downloaded over total size, like `40 MB/83 MB`.
    pub progress: String,
    pub peers: Vec<Peer>,
    pub files: Vec<File>,
}

/// `Peer` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Peer {
    pub addr: String,
    pub client: String,
}

/// `File` API resource.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct File {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub file_size_readable: String,
    pub downloaded_bytes: u64,
    pub downloaded_readable: String,
    pub priority: String,
    /// Only given once a byte of the file has been downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
}

impl From<PeerConnection> for Peer {
    fn from(peer: PeerConnection) -> Self {
        Self {
            addr: peer.addr.to_string(),
            client: peer.client.unwrap_or_else(|| UNKNOWN_PEER_CLIENT.to_string()),
        }
    }
}

impl From<Info> for Torrent {
    fn from(info: Info) -> Self {
        let info_hash = info.info_hash;

        Self {
            name: info.name,
            info_hash: info_hash.to_string(),
            total_peers: info.stats.peers_total,
            active_peers: info.stats.peers_active,
            pending_peers: info.stats.peers_pending,
            half_open_peers: info.stats.peers_half_open,
            download_speed: info.throughput.download_rate,
            download_speed_readable: readable_rate(info.throughput.download_rate),
            upload_speed: info.throughput.upload_rate,
            upload_speed_readable: readable_rate(info.throughput.upload_rate),
            progress: readable_progress(info.bytes_completed, info.length),
            peers: info.peers.into_iter().map(Peer::from).collect(),
            files: info
                .files
                .into_iter()
                .map(|file| File::new(&info_hash, file))
                .collect(),
        }
    }
}

impl File {
    fn new(info_hash: &torrenttp_primitives::info_hash::InfoHash, file: FileInfo) -> Self {
        let started = file.bytes_completed > 0;

        Self {
            stream: started.then(|| stream_link(info_hash, &file.path)),
            download: started.then(|| download_link(info_hash, &file.path)),
            file_size_bytes: file.length,
            file_size_readable: readable_bytes(file.length),
            downloaded_bytes: file.bytes_completed,
            downloaded_readable: readable_bytes(file.bytes_completed),
            priority: file.priority.to_string(),
            file_name: file.path,
        }
    }
}
