//! A [`Transport`] backed by a [`librqbit`] client.
//!
//! The client is started by the first added session and writes below the
//! data directory. A session is registered at once while the client adds
//! the magnet link in the background, so the engine can bound the wait for
//! the metadata with its own deadline.
//!
//! Torrents start with no file wanted. A file whose priority is anything
//! but `none` is part of the client's download set; files are still
//! streamable whatever their priority.
use std::collections::HashSet;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use librqbit::api::TorrentIdOrHash;
use librqbit::{AddTorrent, AddTorrentOptions, ManagedTorrent, SessionOptions};
use parking_lot::Mutex;
use tokio::sync::{watch, OnceCell};
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;
use tracing::{debug, info, warn};

use super::{Error, FileReader, PeerConnection, Session, Stats, TransferFile, Transport};
use crate::core::descriptor::TransferDescriptor;

type Client = Arc<librqbit::Session>;
type ManagedTorrentHandle = Arc<ManagedTorrent>;

pub struct RqbitTransport {
    data_dir: Utf8PathBuf,
    no_upload: bool,
    client: OnceCell<Client>,
    sessions: DashMap<InfoHash, Arc<RqbitSession>>,
}

impl RqbitTransport {
    #[must_use]
    pub fn new(data_dir: &Utf8Path) -> Self {
        Self {
            data_dir: data_dir.to_owned(),
            no_upload: false,
            client: OnceCell::new(),
            sessions: DashMap::new(),
        }
    }

    /// Asks for transfers that never upload. The client has no such switch,
    /// so it is only reported.
    #[must_use]
    pub fn with_no_upload(mut self, no_upload: bool) -> Self {
        self.no_upload = no_upload;
        self
    }

    async fn client(&self) -> Result<Client, Error> {
        self.client
            .get_or_try_init(|| async {
                tokio::fs::create_dir_all(&self.data_dir).await?;

                let options = SessionOptions {
                    disable_dht_persistence: true,
                    ..Default::default()
                };

                let client = librqbit::Session::new_with_opts(self.data_dir.clone().into_std_path_buf(), options)
                    .await
                    .map_err(|err| Error::backend(&format!("{err:#}")))?;

                info!("BitTorrent client started, writing to {}", self.data_dir);

                Ok::<_, Error>(client)
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl Transport for RqbitTransport {
    async fn add_session(&self, descriptor: &TransferDescriptor) -> Result<(Arc<dyn Session>, bool), Error> {
        let info_hash = descriptor.info_hash;

        if let Some(session) = self.sessions.get(&info_hash) {
            return Ok((session.clone() as Arc<dyn Session>, false));
        }

        let client = self.client().await?;

        match self.sessions.entry(info_hash) {
            Entry::Occupied(entry) => Ok((entry.get().clone() as Arc<dyn Session>, false)),
            Entry::Vacant(entry) => {
                if self.no_upload || descriptor.disallow_data_upload {
                    warn!("The BitTorrent client can not refuse uploads, {info_hash} will upload");
                }

                let session = Arc::new(RqbitSession::new(descriptor));

                tokio::spawn(start(client, descriptor.magnet_uri(), session.clone()));

                debug!("Session requested for {info_hash}");

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

        // A pending add finds this state and forgets the torrent itself.
        if let State::Ready(ready) = session.state.send_replace(State::Dropped { delete_data }) {
            ready
                .client
                .delete(TorrentIdOrHash::Hash(ready.handle.info_hash()), delete_data)
                .await
                .map_err(|err| Error::backend(&format!("{err:#}")))?;
        }

        debug!("Session dropped for {info_hash}");

        Ok(())
    }
}

/// Adds the magnet link to the client and publishes the outcome.
async fn start(client: Client, magnet: String, session: Arc<RqbitSession>) {
    let options = AddTorrentOptions {
        overwrite: true,
        only_files: Some(vec![]),
        ..Default::default()
    };

    let outcome = match client.add_torrent(AddTorrent::from_url(magnet), Some(options)).await {
        Ok(response) => match response.into_handle() {
            Some(handle) => Ready::new(client.clone(), handle).map(Arc::new),
            None => Err("the client only listed the torrent".to_owned()),
        },
        Err(err) => Err(format!("{err:#}")),
    };

    let mut orphan = None;

    session.state.send_if_modified(|state| match state {
        State::Dropped { delete_data } => {
            orphan = Some((outcome, *delete_data));
            false
        }
        _ => {
            *state = match outcome {
                Ok(ready) => State::Ready(ready),
                Err(reason) => State::Failed(reason),
            };
            true
        }
    });

    if let Some((Ok(ready), delete_data)) = orphan {
        debug!("Session for {} was dropped while it was added", session.info_hash);

        if let Err(err) = client
            .delete(TorrentIdOrHash::Hash(ready.handle.info_hash()), delete_data)
            .await
        {
            warn!("Unable to forget the dropped torrent {}: {err:#}", session.info_hash);
        }
    }
}

enum State {
    Pending,
    Ready(Arc<Ready>),
    Failed(String),
    Dropped { delete_data: bool },
}

struct Ready {
    client: Client,
    handle: ManagedTorrentHandle,
    files: Vec<Arc<RqbitFile>>,
}

impl Ready {
    fn new(client: Client, handle: ManagedTorrentHandle) -> Result<Self, String> {
        let listing = handle
            .with_metadata(|metadata| {
                metadata
                    .file_infos
                    .iter()
                    .map(|file| (display_path(&file.relative_filename), file.len))
                    .collect::<Vec<_>>()
            })
            .map_err(|err| format!("{err:#}"))?;

        let (wanted, receiver) = watch::channel(HashSet::new());
        let wanted = Arc::new(wanted);

        let files = listing
            .into_iter()
            .enumerate()
            .map(|(index, (path, length))| {
                Arc::new(RqbitFile {
                    index,
                    path,
                    length,
                    handle: handle.clone(),
                    priority: Mutex::new(Priority::None),
                    wanted: wanted.clone(),
                })
            })
            .collect();

        tokio::spawn(apply_download_set(client.clone(), handle.clone(), receiver));

        Ok(Self { client, handle, files })
    }
}

/// Pushes every change of the wanted files to the client, in order. Ends
/// when the files are gone.
async fn apply_download_set(client: Client, handle: ManagedTorrentHandle, mut receiver: watch::Receiver<HashSet<usize>>) {
    while receiver.changed().await.is_ok() {
        let wanted = receiver.borrow_and_update().clone();

        if let Err(err) = client.update_only_files(&handle, &wanted).await {
            warn!("Unable to update the files to download of {}: {err:#}", handle.info_hash().as_string());
        }
    }
}

pub struct RqbitSession {
    info_hash: InfoHash,
    display_name: String,
    state: watch::Sender<State>,
}

impl RqbitSession {
    fn new(descriptor: &TransferDescriptor) -> Self {
        let (state, _) = watch::channel(State::Pending);

        Self {
            info_hash: descriptor.info_hash,
            display_name: descriptor.display_name.clone(),
            state,
        }
    }

    fn ready(&self) -> Option<Arc<Ready>> {
        match &*self.state.borrow() {
            State::Ready(ready) => Some(ready.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl Session for RqbitSession {
    fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    fn name(&self) -> String {
        let files = self.ready().map(|ready| ready.files.clone()).unwrap_or_default();

        torrent_name(&self.display_name, &files, &self.info_hash)
    }

    async fn metadata_ready(&self) -> Result<(), Error> {
        let mut receiver = self.state.subscribe();

        let Ok(state) = receiver.wait_for(|state| !matches!(state, State::Pending)).await else {
            return Err(Error::UnknownSession {
                info_hash: self.info_hash,
                location: Location::caller(),
            });
        };

        match &*state {
            State::Failed(reason) => Err(Error::SessionRejected {
                info_hash: self.info_hash,
                reason: reason.clone(),
                location: Location::caller(),
            }),
            State::Dropped { .. } => Err(Error::UnknownSession {
                info_hash: self.info_hash,
                location: Location::caller(),
            }),
            State::Pending | State::Ready(_) => Ok(()),
        }
    }

    fn files(&self) -> Vec<Arc<dyn TransferFile>> {
        self.ready()
            .map(|ready| ready.files.iter().map(|file| file.clone() as Arc<dyn TransferFile>).collect())
            .unwrap_or_default()
    }

    fn stats(&self) -> Stats {
        let Some(ready) = self.ready() else {
            return Stats::default();
        };

        let stats = ready.handle.stats();

        let (peers_total, peers_active, peers_pending, peers_half_open) = stats.live.as_ref().map_or((0, 0, 0, 0), |live| {
            let peers = &live.snapshot.peer_stats;
            (peers.seen as u64, peers.live as u64, peers.queued as u64, peers.connecting as u64)
        });

        Stats {
            peers_total,
            peers_active,
            peers_pending,
            peers_half_open,
            bytes_downloaded: stats.progress_bytes,
            bytes_uploaded: stats.uploaded_bytes,
        }
    }

    /// The client does not expose its connections.
    fn peers(&self) -> Vec<PeerConnection> {
        vec![]
    }

    fn length(&self) -> u64 {
        self.ready().map_or(0, |ready| ready.files.iter().map(|file| file.length).sum())
    }

    fn bytes_completed(&self) -> u64 {
        self.ready().map_or(0, |ready| ready.handle.stats().progress_bytes)
    }
}

pub struct RqbitFile {
    index: usize,
    path: String,
    length: u64,
    handle: ManagedTorrentHandle,
    priority: Mutex<Priority>,
    wanted: Arc<watch::Sender<HashSet<usize>>>,
}

impl TransferFile for RqbitFile {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn bytes_completed(&self) -> u64 {
        self.handle.stats().file_progress.get(self.index).copied().unwrap_or(0)
    }

    fn priority(&self) -> Priority {
        *self.priority.lock()
    }

    fn set_priority(&self, priority: Priority) {
        *self.priority.lock() = priority;

        self.wanted.send_if_modified(|wanted| {
            if priority.is_wanted() {
                wanted.insert(self.index)
            } else {
                wanted.remove(&self.index)
            }
        });
    }

    /// The client fetches ahead of the stream on its own, `readahead` is not
    /// used.
    fn reader(&self, _readahead: u64) -> Result<Box<dyn FileReader>, Error> {
        let stream = self
            .handle
            .clone()
            .stream(self.index)
            .map_err(|err| Error::backend(&format!("{err:#}")))?;

        Ok(Box::new(Box::pin(stream)))
    }
}

/// `/` separated, whatever the platform.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn torrent_name(display_name: &str, files: &[Arc<RqbitFile>], info_hash: &InfoHash) -> String {
    if !display_name.is_empty() {
        return display_name.to_owned();
    }

    match files {
        [file] => file.path.clone(),
        _ => info_hash.to_hex_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::str::FromStr;

    use torrenttp_primitives::info_hash::InfoHash;

    use super::{display_path, torrent_name, RqbitTransport};
    use crate::core::transport::{Error, Transport};

    fn sample_info_hash() -> InfoHash {
        InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").expect("it should be a valid info-hash")
    }

    #[tokio::test]
    async fn dropping_an_unknown_session_should_fail_without_starting_the_client() {
        let transport = RqbitTransport::new(camino::Utf8Path::new("./storage/torrenttp/unused"));

        let result = transport.drop_session(&sample_info_hash(), false).await;

        assert!(matches!(result, Err(Error::UnknownSession { .. })));
        assert!(transport.client.get().is_none());
    }

    #[test]
    fn nested_file_paths_should_be_slash_separated() {
        let path: PathBuf = ["season 1", "episode 1.mkv"].iter().collect();

        assert_eq!(display_path(&path), "season 1/episode 1.mkv");
    }

    #[test]
    fn the_display_name_should_win_over_the_info_hash() {
        assert_eq!(torrent_name("Big Buck Bunny", &[], &sample_info_hash()), "Big Buck Bunny");
        assert_eq!(
            torrent_name("", &[], &sample_info_hash()),
            "3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0"
        );
    }
}
