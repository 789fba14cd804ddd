//! The contract with the peer-to-peer transport.
//!
//! The core never speaks the `BitTorrent` wire protocol. It asks a
//! [`Transport`] to start or drop sessions, reads counters from the live
//! [`Session`] and sets per-file priorities on its [`TransferFile`]s.
//!
//! [`rqbit::RqbitTransport`] joins real swarms. [`memory::MemoryTransport`]
//! is an in-process catalog used by the tests, and by the binary when the
//! configuration asks for it.
pub mod memory;
#[cfg(feature = "rqbit")]
pub mod rqbit;

use std::net::SocketAddr;
use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncSeek};
use torrenttp_located_error::{Located, LocatedError};
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;

use super::descriptor::TransferDescriptor;

/// Transport failures.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("The transport refused to create a session for {info_hash}: {reason}, {location}")]
    SessionRejected {
        info_hash: InfoHash,
        reason: String,
        location: &'static Location<'static>,
    },

    #[error("The transport has no session for {info_hash}, {location}")]
    UnknownSession {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },

    #[error("The transport failed: {reason}, {location}")]
    Backend {
        reason: String,
        location: &'static Location<'static>,
    },

    #[error("Transport I/O failure: {source}")]
    Io {
        source: LocatedError<'static, std::io::Error>,
    },
}

impl Error {
    #[track_caller]
    pub(crate) fn backend(reason: &str) -> Self {
        Self::Backend {
            reason: reason.to_owned(),
            location: Location::caller(),
        }
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: Located(err).into(),
        }
    }
}

/// Peer counters and cumulative byte counters of a session.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub peers_total: u64,
    pub peers_active: u64,
    pub peers_pending: u64,
    pub peers_half_open: u64,
    /// Monotonically increasing.
    pub bytes_downloaded: u64,
    /// Monotonically increasing.
    pub bytes_uploaded: u64,
}

/// A connected peer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PeerConnection {
    pub addr: SocketAddr,
    /// The client name announced by the peer, if any.
    pub client: Option<String>,
}

/// A random access reader over the bytes of one file.
pub trait FileReader: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T> FileReader for T where T: AsyncRead + AsyncSeek + Send + Unpin {}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Starts a session for the descriptor, or returns the running one.
    ///
    /// The boolean is `true` when the session was created by this call.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the transport can not create the session.
    async fn add_session(&self, descriptor: &TransferDescriptor) -> Result<(Arc<dyn Session>, bool), Error>;

    /// Stops a session, optionally deleting the data downloaded so far.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session is unknown or the data can not be
    /// deleted.
    async fn drop_session(&self, info_hash: &InfoHash, delete_data: bool) -> Result<(), Error>;
}

#[async_trait]
pub trait Session: Send + Sync {
    fn info_hash(&self) -> InfoHash;

    /// The torrent name once the metadata is known, the display name before.
    fn name(&self) -> String;

    /// Resolves once the metadata (the file list) is known.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session failed before the metadata arrived.
    async fn metadata_ready(&self) -> Result<(), Error>;

    /// Empty until the metadata is known.
    fn files(&self) -> Vec<Arc<dyn TransferFile>>;

    fn stats(&self) -> Stats;

    fn peers(&self) -> Vec<PeerConnection>;

    /// Total length in bytes.
    fn length(&self) -> u64;

    fn bytes_completed(&self) -> u64;
}

pub trait TransferFile: Send + Sync {
    /// The relative display path, `/` separated.
    fn path(&self) -> String;

    fn length(&self) -> u64;

    fn bytes_completed(&self) -> u64;

    fn priority(&self) -> Priority;

    fn set_priority(&self, priority: Priority);

    /// Opens a reader. `readahead` is the number of bytes the transport should
    /// try to fetch ahead of the read position.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file data can not be opened.
    fn reader(&self, readahead: u64) -> Result<Box<dyn FileReader>, Error>;

    fn is_complete(&self) -> bool {
        self.bytes_completed() == self.length()
    }
}
