//! An in-process [`Transport`].
//!
//! Transfers are served from a catalog instead of a swarm:
//!
//! - torrents registered with [`MemoryTransport::publish`], whose bytes live
//!   in memory and start undownloaded, and
//! - torrents seeded from disk: a directory named after the lowercase
//!   info-hash inside the seed directory. Every regular file below it is a
//!   file of the torrent and is already complete.
//!
//! A session for a torrent that is in neither place waits for its metadata
//! until someone publishes it, exactly like a magnet link without reachable
//! peers.
use std::io::Cursor;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;
use tracing::{debug, warn};

use super::{Error, FileReader, PeerConnection, Session, Stats, TransferFile, Transport};
use crate::core::descriptor::TransferDescriptor;

#[derive(Clone)]
enum Source {
    Bytes(Arc<[u8]>),
    Disk { path: Utf8PathBuf, length: u64 },
}

impl Source {
    fn length(&self) -> u64 {
        match self {
            Source::Bytes(bytes) => bytes.len() as u64,
            Source::Disk { length, .. } => *length,
        }
    }
}

#[derive(Clone)]
struct Catalogued {
    name: String,
    files: Vec<(String, Source)>,
    complete: bool,
}

#[derive(Default)]
pub struct MemoryTransport {
    catalog: DashMap<InfoHash, Catalogued>,
    sessions: DashMap<InfoHash, Arc<MemorySession>>,
    rejected: DashMap<InfoHash, String>,
    seed_dir: Option<Utf8PathBuf>,
    no_upload: bool,
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves the torrents found below `seed_dir`.
    #[must_use]
    pub fn with_seed_dir(mut self, seed_dir: &Utf8Path) -> Self {
        self.seed_dir = Some(seed_dir.to_owned());
        self
    }

    /// Never uploads, whatever the descriptor says.
    #[must_use]
    pub fn with_no_upload(mut self, no_upload: bool) -> Self {
        self.no_upload = no_upload;
        self
    }

    /// Makes the metadata of a torrent known. Sessions already waiting for it
    /// are released.
    pub fn publish(&self, info_hash: InfoHash, name: &str, files: Vec<(String, Vec<u8>)>) {
        let entry = Catalogued {
            name: name.to_owned(),
            files: files
                .into_iter()
                .map(|(path, bytes)| (path, Source::Bytes(Arc::from(bytes))))
                .collect(),
            complete: false,
        };

        if let Some(session) = self.sessions.get(&info_hash) {
            session.resolve(&entry);
        }

        self.catalog.insert(info_hash, entry);
    }

    /// Every following `add_session` for the info-hash fails.
    pub fn reject(&self, info_hash: InfoHash, reason: &str) {
        self.rejected.insert(info_hash, reason.to_owned());
    }

    #[must_use]
    pub fn session(&self, info_hash: &InfoHash) -> Option<Arc<MemorySession>> {
        self.sessions.get(info_hash).map(|session| session.clone())
    }

    #[must_use]
    pub fn sessions_len(&self) -> usize {
        self.sessions.len()
    }

    fn seeded(&self, info_hash: &InfoHash) -> Option<Catalogued> {
        let root = self.seed_dir.as_ref()?.join(info_hash.to_hex_string());

        if !root.is_dir() {
            return None;
        }

        let mut files = vec![];
        collect_files(&root, &root, &mut files);
        files.sort_by(|a, b| a.0.cmp(&b.0));

        Some(Catalogued {
            name: info_hash.to_hex_string(),
            files,
            complete: true,
        })
    }
}

fn collect_files(root: &Utf8Path, dir: &Utf8Path, files: &mut Vec<(String, Source)>) {
    let entries = match dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Unable to list {dir}: {err}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            collect_files(root, path, files);
        } else if let (Ok(relative), Ok(metadata)) = (path.strip_prefix(root), entry.metadata()) {
            let display_path = relative.components().map(|c| c.as_str()).collect::<Vec<_>>().join("/");

            files.push((
                display_path,
                Source::Disk {
                    path: path.to_owned(),
                    length: metadata.len(),
                },
            ));
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn add_session(&self, descriptor: &TransferDescriptor) -> Result<(Arc<dyn Session>, bool), Error> {
        let info_hash = descriptor.info_hash;

        if let Some(reason) = self.rejected.get(&info_hash) {
            return Err(Error::SessionRejected {
                info_hash,
                reason: reason.clone(),
                location: Location::caller(),
            });
        }

        let known = self
            .catalog
            .get(&info_hash)
            .map(|entry| entry.clone())
            .or_else(|| self.seeded(&info_hash));

        match self.sessions.entry(info_hash) {
            Entry::Occupied(entry) => Ok((entry.get().clone() as Arc<dyn Session>, false)),
            Entry::Vacant(entry) => {
                // Only seeded torrents own data on disk.
                let data_dir = known
                    .as_ref()
                    .filter(|known| known.complete)
                    .and_then(|_| self.seed_dir.as_ref())
                    .map(|dir| dir.join(info_hash.to_hex_string()));

                let session = Arc::new(MemorySession::new(
                    descriptor,
                    self.no_upload || descriptor.disallow_data_upload,
                    data_dir,
                ));

                if let Some(known) = known {
                    session.resolve(&known);
                }

                debug!("Memory session created for {info_hash}");

                entry.insert(session.clone());

                Ok((session as Arc<dyn Session>, true))
            }
        }
    }

    async fn drop_session(&self, info_hash: &InfoHash, delete_data: bool) -> Result<(), Error> {
        let Some((_, session)) = self.sessions.remove(info_hash) else {
            return Err(Error::UnknownSession {
                info_hash: *info_hash,
                location: Location::caller(),
            });
        };

        if delete_data {
            if let Some(dir) = &session.data_dir {
                match tokio::fs::remove_dir_all(dir).await {
                    Err(err) if err.kind() != std::io::ErrorKind::NotFound => return Err(err.into()),
                    _ => {}
                }
            }
        }

        debug!("Memory session dropped for {info_hash}");

        Ok(())
    }
}

#[derive(Clone, Default)]
struct Metadata {
    name: String,
    files: Vec<Arc<MemoryFile>>,
}

pub struct MemorySession {
    info_hash: InfoHash,
    display_name: String,
    metadata: watch::Sender<Option<Metadata>>,
    bytes_downloaded: AtomicU64,
    bytes_uploaded: AtomicU64,
    peers: RwLock<Vec<PeerConnection>>,
    upload_disallowed: bool,
    data_dir: Option<Utf8PathBuf>,
}

impl MemorySession {
    fn new(descriptor: &TransferDescriptor, upload_disallowed: bool, data_dir: Option<Utf8PathBuf>) -> Self {
        let (metadata, _) = watch::channel(None);

        Self {
            info_hash: descriptor.info_hash,
            display_name: descriptor.display_name.clone(),
            metadata,
            bytes_downloaded: AtomicU64::new(0),
            bytes_uploaded: AtomicU64::new(0),
            peers: RwLock::new(vec![]),
            upload_disallowed,
            data_dir,
        }
    }

    fn resolve(&self, entry: &Catalogued) {
        let files = entry
            .files
            .iter()
            .map(|(path, source)| {
                let completed = if entry.complete { source.length() } else { 0 };
                Arc::new(MemoryFile::new(path, source.clone(), completed))
            })
            .collect();

        self.metadata.send_replace(Some(Metadata {
            name: entry.name.clone(),
            files,
        }));
    }

    fn metadata(&self) -> Metadata {
        self.metadata.borrow().clone().unwrap_or_default()
    }

    #[must_use]
    pub fn file(&self, path: &str) -> Option<Arc<MemoryFile>> {
        self.metadata().files.into_iter().find(|file| file.path == path)
    }

    /// Marks `bytes` more bytes of the file as downloaded.
    pub fn download(&self, path: &str, bytes: u64) {
        if let Some(file) = self.file(path) {
            let fetched = file.fetch(bytes);
            self.bytes_downloaded.fetch_add(fetched, Ordering::Relaxed);
        }
    }

    /// Completes every file.
    pub fn download_all(&self) {
        for file in self.metadata().files {
            let fetched = file.fetch(file.length());
            self.bytes_downloaded.fetch_add(fetched, Ordering::Relaxed);
        }
    }

    /// Counts bytes sent to other peers. Nothing is counted when uploading
    /// is disallowed.
    pub fn upload(&self, bytes: u64) {
        if !self.upload_disallowed {
            self.bytes_uploaded.fetch_add(bytes, Ordering::Relaxed);
        }
    }

    pub fn set_peers(&self, peers: Vec<PeerConnection>) {
        *self.peers.write() = peers;
    }

    #[must_use]
    pub fn upload_disallowed(&self) -> bool {
        self.upload_disallowed
    }
}

#[async_trait]
impl Session for MemorySession {
    fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    fn name(&self) -> String {
        match self.metadata.borrow().as_ref() {
            Some(metadata) => metadata.name.clone(),
            None => self.display_name.clone(),
        }
    }

    async fn metadata_ready(&self) -> Result<(), Error> {
        let mut receiver = self.metadata.subscribe();

        // The sender lives as long as `self`, so the wait can not fail.
        let _ = receiver.wait_for(Option::is_some).await;

        Ok(())
    }

    fn files(&self) -> Vec<Arc<dyn TransferFile>> {
        self.metadata()
            .files
            .into_iter()
            .map(|file| file as Arc<dyn TransferFile>)
            .collect()
    }

    fn stats(&self) -> Stats {
        let peers = self.peers.read().len() as u64;

        Stats {
            peers_total: peers,
            peers_active: peers,
            peers_pending: 0,
            peers_half_open: 0,
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
            bytes_uploaded: self.bytes_uploaded.load(Ordering::Relaxed),
        }
    }

    fn peers(&self) -> Vec<PeerConnection> {
        self.peers.read().clone()
    }

    fn length(&self) -> u64 {
        self.metadata().files.iter().map(|file| file.length()).sum()
    }

    fn bytes_completed(&self) -> u64 {
        self.metadata().files.iter().map(|file| file.bytes_completed()).sum()
    }
}

pub struct MemoryFile {
    path: String,
    source: Source,
    completed: AtomicU64,
    priority: Mutex<Priority>,
    readahead: AtomicU64,
}

impl MemoryFile {
    fn new(path: &str, source: Source, completed: u64) -> Self {
        Self {
            path: path.to_owned(),
            source,
            completed: AtomicU64::new(completed),
            priority: Mutex::new(Priority::None),
            readahead: AtomicU64::new(0),
        }
    }

    /// Returns how many bytes were actually added.
    fn fetch(&self, bytes: u64) -> u64 {
        let length = self.source.length();

        let previous = self
            .completed
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |completed| {
                Some(completed.saturating_add(bytes).min(length))
            })
            .unwrap_or(length);

        previous.saturating_add(bytes).min(length) - previous
    }

    /// The readahead asked by the last opened reader.
    #[must_use]
    pub fn last_readahead(&self) -> u64 {
        self.readahead.load(Ordering::Relaxed)
    }
}

impl TransferFile for MemoryFile {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn length(&self) -> u64 {
        self.source.length()
    }

    fn bytes_completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    fn priority(&self) -> Priority {
        *self.priority.lock()
    }

    fn set_priority(&self, priority: Priority) {
        *self.priority.lock() = priority;
    }

    fn reader(&self, readahead: u64) -> Result<Box<dyn FileReader>, Error> {
        self.readahead.store(readahead, Ordering::Relaxed);

        match &self.source {
            Source::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Source::Disk { path, .. } => {
                let file = std::fs::File::open(path)?;
                Ok(Box::new(tokio::fs::File::from_std(file)))
            }
        }
    }
}
