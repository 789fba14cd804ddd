//! The in-memory registry of active transfers.
//!
//! It maps info-hashes to [`SessionHandle`]s. Mutations for one info-hash
//! are serialized with a per-key async lock, so an add and a remove of the
//! same transfer never interleave and no one observes a handle that is
//! still being built.
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;
use torrenttp_primitives::info_hash::InfoHash;

use super::descriptor::TransferDescriptor;
use super::throughput::Throughput;
use super::transport::{Session, TransferFile};

/// The runtime reference to an active transfer.
pub struct SessionHandle {
    session: Arc<dyn Session>,
    descriptor: RwLock<TransferDescriptor>,
    throughput: Mutex<Throughput>,
}

impl SessionHandle {
    #[must_use]
    pub fn new(session: Arc<dyn Session>, descriptor: TransferDescriptor) -> Self {
        let stats = session.stats();

        Self {
            session,
            descriptor: RwLock::new(descriptor),
            throughput: Mutex::new(Throughput::starting_at(stats.bytes_downloaded, stats.bytes_uploaded)),
        }
    }

    #[must_use]
    pub fn info_hash(&self) -> InfoHash {
        self.descriptor.read().info_hash
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// A copy of the descriptor as last persisted.
    #[must_use]
    pub fn descriptor(&self) -> TransferDescriptor {
        self.descriptor.read().clone()
    }

    pub fn replace_descriptor(&self, descriptor: TransferDescriptor) {
        *self.descriptor.write() = descriptor;
    }

    /// Finds a file by its exact display path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<Arc<dyn TransferFile>> {
        self.session.files().into_iter().find(|file| file.path() == path)
    }

    #[must_use]
    pub fn throughput(&self) -> Throughput {
        *self.throughput.lock()
    }

    /// Reads the transport counters and refreshes the rates.
    pub fn sample_throughput(&self, interval: Duration) {
        let stats = self.session.stats();

        self.throughput
            .lock()
            .sample(stats.bytes_downloaded, stats.bytes_uploaded, interval);
    }
}

#[derive(Default)]
pub struct Registry {
    handles: DashMap<InfoHash, Arc<SessionHandle>>,
    locks: DashMap<InfoHash, Arc<tokio::sync::Mutex<()>>>,
}

impl Registry {
    #[must_use]
    pub fn get(&self, info_hash: &InfoHash) -> Option<Arc<SessionHandle>> {
        self.handles.get(info_hash).map(|handle| handle.clone())
    }

    pub fn insert(&self, handle: Arc<SessionHandle>) {
        self.handles.insert(handle.info_hash(), handle);
    }

    pub fn remove(&self, info_hash: &InfoHash) -> Option<Arc<SessionHandle>> {
        self.handles.remove(info_hash).map(|(_, handle)| handle)
    }

    /// A snapshot of the registered handles, ordered by info-hash.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<SessionHandle>> {
        let mut handles: Vec<Arc<SessionHandle>> = self.handles.iter().map(|entry| entry.value().clone()).collect();
        handles.sort_by_key(|handle| handle.info_hash());
        handles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for exclusive access to the info-hash.
    ///
    /// The `KeyLock` exists before the wait starts, so a caller that gives
    /// up waiting still releases its lock entry.
    pub async fn lock(&self, info_hash: &InfoHash) -> KeyLock<'_> {
        let mut key_lock = KeyLock {
            locks: &self.locks,
            info_hash: *info_hash,
            guard: None,
        };

        let mutex = self.locks.entry(*info_hash).or_default().clone();

        key_lock.guard = Some(mutex.lock_owned().await);

        key_lock
    }
}

/// Exclusive access to one info-hash. The lock entry is forgotten once no
/// one holds it or waits for it.
pub struct KeyLock<'a> {
    locks: &'a DashMap<InfoHash, Arc<tokio::sync::Mutex<()>>>,
    info_hash: InfoHash,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.remove_if(&self.info_hash, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
