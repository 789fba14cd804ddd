//! The core `engine` module contains the session and persistence logic,
//! independent of the delivery layer.
//!
//! It's a domain layer which does not specify how the end user reaches the
//! [`Engine`]. Typically it is used by higher modules like the HTTP API:
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!     HTTP API |> Engine |> Transport (peer-to-peer)
//!                        |> Spec store (SQLite)
//! ```
//!
//! # Table of contents
//!
//! - [Engine](#engine)
//! - [Adding a torrent](#adding-a-torrent)
//! - [Removing a torrent](#removing-a-torrent)
//! - [File selection](#file-selection)
//! - [Recovery](#recovery)
//! - [Throughput](#throughput)
//! - [Persistence](#persistence)
//!
//! # Engine
//!
//! The `Engine` owns the [registry](crate::core::registry) of active
//! transfers and keeps it consistent with the
//! [spec store](crate::core::databases) and the
//! [transport](crate::core::transport). It is built once at startup and
//! shared by every request handler and background job.
//!
//! # Adding a torrent
//!
//! [`Engine::add_torrent`] asks the transport for a session, waits for the
//! transfer metadata (bounded by `engine.metadata_timeout`), persists the
//! [`TransferDescriptor`] and registers a [`SessionHandle`]. Adding an
//! info-hash that is already registered returns the existing handle.
//!
//! # Removing a torrent
//!
//! [`Engine::remove_torrent`] drops the transport session, then deletes the
//! stored record, then forgets the handle. If the process dies in between,
//! the next recovery pass finds a stale record, fails to recreate it or
//! recreates it, and in both cases converges.
//!
//! # File selection
//!
//! See [`selection`].
//!
//! # Recovery
//!
//! See [`recovery`].
//!
//! # Throughput
//!
//! [`Engine::sample_throughput`] refreshes the download and upload rates of
//! every handle. It is called by the throughput job on a fixed interval,
//! with the time actually elapsed since the previous tick.
//!
//! # Persistence
//!
//! One record per info-hash. See [`databases`].
pub mod auth;
pub mod databases;
pub mod descriptor;
pub mod error;
pub mod metainfo;
pub mod recovery;
pub mod registry;
pub mod selection;
pub mod services;
pub mod throughput;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

use torrenttp_configuration::Configuration;
use torrenttp_primitives::info_hash::InfoHash;
use tracing::{debug, info, warn};

use self::databases::Database;
use self::descriptor::TransferDescriptor;
use self::error::Error;
use self::registry::{Registry, SessionHandle};
use self::transport::{TransferFile, Transport};

/// Whether a successful add writes the descriptor to the spec store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    /// A new transfer requested by a client.
    Save,
    /// A transfer recreated from the spec store.
    Skip,
}

/// The service object owning the active transfers.
pub struct Engine {
    transport: Arc<dyn Transport>,
    /// The spec store driver: [`Sqlite3`](crate::core::databases::sqlite)
    pub database: Arc<Box<dyn Database>>,
    registry: Registry,
    metadata_timeout: Duration,
    throughput_interval: Duration,
}

impl Engine {
    /// `Engine` constructor.
    ///
    /// # Errors
    ///
    /// Will return a `databases::error::Error` if unable to connect to database.
    pub fn new(config: &Configuration, transport: Arc<dyn Transport>) -> Result<Engine, databases::error::Error> {
        let database = Arc::new(databases::driver::build(&config.database.driver, &config.database.path)?);

        Ok(Engine {
            transport,
            database,
            registry: Registry::default(),
            metadata_timeout: config.engine.metadata_timeout(),
            throughput_interval: config.engine.throughput_interval(),
        })
    }

    #[must_use]
    pub fn metadata_timeout(&self) -> Duration {
        self.metadata_timeout
    }

    #[must_use]
    pub fn throughput_interval(&self) -> Duration {
        self.throughput_interval
    }

    /// It starts (or finds) the transfer for the descriptor and registers it.
    ///
    /// # Errors
    ///
    /// Will return:
    ///
    /// - `Error::Transport` if the transport can not create the session, or
    ///   the session fails before its metadata arrives.
    /// - `Error::DeadlineExceeded` if the metadata does not arrive in time.
    /// - `Error::Storage` if the descriptor can not be persisted.
    ///
    /// On error nothing is registered, nothing is persisted and a session
    /// created by this call is dropped.
    pub async fn add_torrent(&self, descriptor: TransferDescriptor, persist: Persist) -> Result<Arc<SessionHandle>, Error> {
        let info_hash = descriptor.info_hash;

        let _lock = self.registry.lock(&info_hash).await;

        if let Some(handle) = self.registry.get(&info_hash) {
            debug!("Torrent {info_hash} is already registered");
            return Ok(handle);
        }

        let (session, is_new) = self.transport.add_session(&descriptor).await?;

        match tokio::time::timeout(self.metadata_timeout, session.metadata_ready()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!("Session for {info_hash} failed before its metadata arrived: {err}");

                if is_new {
                    self.discard_session(&info_hash).await;
                }

                return Err(err.into());
            }
            Err(_) => {
                warn!("No metadata for {info_hash} after {:?}", self.metadata_timeout);

                if is_new {
                    self.discard_session(&info_hash).await;
                }

                return Err(Error::DeadlineExceeded {
                    info_hash,
                    timeout: self.metadata_timeout,
                    location: std::panic::Location::caller(),
                });
            }
        }

        if persist == Persist::Save {
            if let Err(err) = self.database.save_torrent_spec(&descriptor) {
                if is_new {
                    self.discard_session(&info_hash).await;
                }

                return Err(err.into());
            }
        }

        let handle = Arc::new(SessionHandle::new(session, descriptor));

        self.registry.insert(handle.clone());

        info!("Torrent {info_hash} added: {}", handle.session().name());

        Ok(handle)
    }

    /// It returns the handle of a registered transfer.
    ///
    /// # Errors
    ///
    /// Will return `Error::TorrentNotFound` if the transfer is not registered.
    pub fn get_torrent(&self, info_hash: &InfoHash) -> Result<Arc<SessionHandle>, Error> {
        self.registry.get(info_hash).ok_or_else(|| Error::torrent_not_found(info_hash))
    }

    /// It returns a file of a registered transfer, by its exact display
    /// path.
    ///
    /// # Errors
    ///
    /// Will return `Error::TorrentNotFound` if the transfer is not registered
    /// and `Error::FileNotFound` if it has no such file.
    pub fn get_file(&self, info_hash: &InfoHash, path: &str) -> Result<Arc<dyn TransferFile>, Error> {
        self.get_torrent(info_hash)?
            .file(path)
            .ok_or_else(|| Error::file_not_found(info_hash, path))
    }

    /// A snapshot of the registered transfers.
    #[must_use]
    pub fn torrents(&self) -> Vec<Arc<SessionHandle>> {
        self.registry.all()
    }

    /// It stops a transfer and forgets it. Returns the removed handle.
    ///
    /// # Errors
    ///
    /// Will return:
    ///
    /// - `Error::TorrentNotFound` if the transfer is not registered.
    /// - `Error::Transport` if the transport fails to drop the session. The
    ///   transfer stays registered and persisted.
    /// - `Error::Storage` if the record can not be deleted. The handle is
    ///   forgotten anyway, the next recovery pass drops the stale record.
    pub async fn remove_torrent(&self, info_hash: &InfoHash, delete_data: bool) -> Result<Arc<SessionHandle>, Error> {
        let _lock = self.registry.lock(info_hash).await;

        let handle = self.get_torrent(info_hash)?;

        match self.transport.drop_session(info_hash, delete_data).await {
            Ok(()) => {}
            Err(transport::Error::UnknownSession { .. }) => {
                warn!("The transport had already dropped {info_hash}");
            }
            Err(err) => return Err(err.into()),
        }

        let deleted = self.database.remove_torrent_spec(info_hash);

        self.registry.remove(info_hash);

        deleted?;

        info!("Torrent {info_hash} removed");

        Ok(handle)
    }

    /// Refreshes the throughput of every registered transfer. `elapsed` is
    /// the time since the previous sample.
    pub fn sample_throughput(&self, elapsed: Duration) {
        for handle in self.registry.all() {
            handle.sample_throughput(elapsed);
        }
    }

    async fn discard_session(&self, info_hash: &InfoHash) {
        if let Err(err) = self.transport.drop_session(info_hash, false).await {
            warn!("Unable to drop the session of {info_hash}: {err}");
        }
    }
}
