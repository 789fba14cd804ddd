//! API forms for the [`torrent`](crate::servers::apis::v1::context::torrent)
//! API context.
use serde::Deserialize;

/// Body of `POST /addtorrent`.
///
/// A non empty `magnet` wins over the other fields.
#[derive(Deserialize, Debug, Default)]
pub struct AddTorrentForm {
    #[serde(default)]
    pub magnet: String,
    #[serde(default)]
    pub info_hash: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub trackers: Vec<String>,
}

/// Body of `POST /selectfile`.
#[derive(Deserialize, Debug)]
pub struct SelectFileForm {
    pub info_hash: String,
    #[serde(default)]
    pub all_files: bool,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Body of `POST /setpriority`.
#[derive(Deserialize, Debug)]
pub struct SetPriorityForm {
    pub info_hash: String,
    #[serde(default)]
    pub all_files: bool,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub priority: String,
}

/// Body of `DELETE /removetorrent`.
#[derive(Deserialize, Debug)]
pub struct RemoveTorrentForm {
    pub info_hash: String,
    #[serde(default)]
    pub remove_files: bool,
}
