//! The durable description of a transfer.
//!
//! A [`TransferDescriptor`] holds everything needed to recreate a transfer
//! after a restart: the identity, the bootstrap hints handed to the
//! transport and the file selection the user made. It is a value: every
//! change produces a full replacement of the persisted record.
use serde::{Deserialize, Serialize};
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;

/// The persisted unit, one per info-hash.
#[allow(clippy::struct_excessive_bools)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferDescriptor {
    pub info_hash: InfoHash,
    #[serde(default)]
    pub display_name: String,
    /// Announce URLs grouped in tiers.
    #[serde(default)]
    pub trackers: Vec<Vec<String>>,
    #[serde(default)]
    pub webseeds: Vec<String>,
    #[serde(default)]
    pub dht_nodes: Vec<String>,
    #[serde(default)]
    pub peer_addrs: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub disable_initial_piece_check: bool,
    #[serde(default)]
    pub disallow_data_upload: bool,
    #[serde(default)]
    pub disallow_data_download: bool,
    /// Every file of the transfer is wanted.
    #[serde(default)]
    pub selected_all: bool,
    /// Explicit per-file selection, in the order it was made.
    #[serde(default)]
    pub selected_files: Vec<SelectedFile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: String,
    pub priority: Priority,
}

/// A priority change to fold into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    /// The change was requested for every file of the transfer.
    pub all_files: bool,
    /// Paths that were actually resolved on the live session.
    pub paths: Vec<String>,
    pub priority: Priority,
}

impl TransferDescriptor {
    #[must_use]
    pub fn new(info_hash: InfoHash) -> Self {
        Self {
            info_hash,
            display_name: String::new(),
            trackers: Vec::new(),
            webseeds: Vec::new(),
            dht_nodes: Vec::new(),
            peer_addrs: Vec::new(),
            sources: Vec::new(),
            disable_initial_piece_check: false,
            disallow_data_upload: false,
            disallow_data_download: false,
            selected_all: false,
            selected_files: Vec::new(),
        }
    }

    /// Folds a priority change into the selection.
    ///
    /// Paths are upserted, so repeating the same change never duplicates an
    /// entry. When the change covers every file, `selected_all` follows
    /// whether the priority still means "download".
    pub fn apply_selection(&mut self, change: &SelectionChange) {
        if change.all_files {
            self.selected_all = change.priority.is_wanted();
        }

        for path in &change.paths {
            match self.selected_files.iter_mut().find(|file| &file.path == path) {
                Some(file) => file.priority = change.priority,
                None => self.selected_files.push(SelectedFile {
                    path: path.clone(),
                    priority: change.priority,
                }),
            }
        }
    }

    /// The remembered priority of a file, if it was ever selected.
    #[must_use]
    pub fn priority_of(&self, path: &str) -> Option<Priority> {
        self.selected_files
            .iter()
            .find(|file| file.path == path)
            .map(|file| file.priority)
    }

    /// All the announce URLs, tiers flattened.
    pub fn announce_urls(&self) -> impl Iterator<Item = &String> {
        self.trackers.iter().flatten()
    }

    /// A magnet link carrying the identity and the bootstrap hints.
    ///
    /// Tracker tiers are flattened, a magnet link has no notion of tiers.
    #[must_use]
    pub fn magnet_uri(&self) -> String {
        let mut params = url::form_urlencoded::Serializer::new(String::new());

        if !self.display_name.is_empty() {
            params.append_pair("dn", &self.display_name);
        }
        for tracker in self.announce_urls() {
            params.append_pair("tr", tracker);
        }
        for webseed in &self.webseeds {
            params.append_pair("ws", webseed);
        }
        for peer in &self.peer_addrs {
            params.append_pair("x.pe", peer);
        }

        let params = params.finish();
        let mut uri = format!("magnet:?xt=urn:btih:{}", self.info_hash.to_hex_string());

        if !params.is_empty() {
            uri.push('&');
            uri.push_str(&params);
        }

        uri
    }
}
