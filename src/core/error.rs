//! Errors returned by the core [`Engine`](crate::core::Engine).
//!
//! Error | Context | Description
//! ---|---|---
//! `InvalidArgument` | Validation | A malformed request, for example an empty file selection.
//! `InvalidInfoHash` | Validation | The info-hash is not 40 hexadecimal characters.
//! `TorrentNotFound` | Registry | The transfer is not registered.
//! `FileNotFound` | Registry | The transfer has no file with that path.
//! `Unavailable` | Files | The file is not completely downloaded yet.
//! `DeadlineExceeded` | Registry | The transfer metadata did not arrive in time.
//! `Storage` | Persistence | The spec store failed.
//! `Transport` | Transport | The transport failed to create, drop or read a session.
use std::panic::Location;
use std::time::Duration;

use torrenttp_located_error::{Located, LocatedError};
use torrenttp_primitives::info_hash::{ConversionError, InfoHash};

use super::databases;
use super::transport;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    // Validation errors
    #[error("{message}, {location}")]
    InvalidArgument {
        message: String,
        location: &'static Location<'static>,
    },
    #[error("Invalid info-hash `{value}`: {source}")]
    InvalidInfoHash {
        value: String,
        source: LocatedError<'static, ConversionError>,
    },

    // Lookup errors
    #[error("Torrent {info_hash} not found, {location}")]
    TorrentNotFound {
        info_hash: InfoHash,
        location: &'static Location<'static>,
    },
    #[error("File `{path}` not found in torrent {info_hash}, {location}")]
    FileNotFound {
        info_hash: InfoHash,
        path: String,
        location: &'static Location<'static>,
    },
    #[error("File is not completed")]
    Unavailable { path: String },

    // Session errors
    #[error("The metadata of {info_hash} did not arrive within {timeout:?}, {location}")]
    DeadlineExceeded {
        info_hash: InfoHash,
        timeout: Duration,
        location: &'static Location<'static>,
    },

    // Collaborator errors
    #[error("Spec store error: {source}")]
    Storage {
        source: LocatedError<'static, databases::error::Error>,
    },
    #[error("Transport error: {source}")]
    Transport {
        source: LocatedError<'static, transport::Error>,
    },
}

impl Error {
    #[track_caller]
    pub fn invalid_argument(message: &str) -> Self {
        Self::InvalidArgument {
            message: message.to_owned(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_info_hash(value: &str, err: ConversionError) -> Self {
        Self::InvalidInfoHash {
            value: value.to_owned(),
            source: Located(err).into(),
        }
    }

    #[track_caller]
    pub fn torrent_not_found(info_hash: &InfoHash) -> Self {
        Self::TorrentNotFound {
            info_hash: *info_hash,
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn file_not_found(info_hash: &InfoHash, path: &str) -> Self {
        Self::FileNotFound {
            info_hash: *info_hash,
            path: path.to_owned(),
            location: Location::caller(),
        }
    }

    /// The lookup failed because the transfer or the file is unknown.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TorrentNotFound { .. } | Self::FileNotFound { .. })
    }
}

impl From<databases::error::Error> for Error {
    #[track_caller]
    fn from(err: databases::error::Error) -> Self {
        Self::Storage {
            source: Located(err).into(),
        }
    }
}

impl From<transport::Error> for Error {
    #[track_caller]
    fn from(err: transport::Error) -> Self {
        Self::Transport {
            source: Located(err).into(),
        }
    }
}
