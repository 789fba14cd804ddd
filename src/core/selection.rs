//! File selection.
//!
//! A selection sets the download priority of some files of a registered
//! transfer and records the decision in the spec store, so a restart brings
//! back the latest desired state and not the state at creation time.
//!
//! - With `all_files` every file currently known for the transfer is
//!   changed and the explicit list is ignored.
//! - Otherwise each path is matched exactly against the file list. Unknown
//!   paths are skipped, clients may hold a stale listing.
//!
//! The whole selection runs under the lock of the info-hash, the same one
//! taken by adds and removes. Selections of one transfer are applied one
//! after the other, and a transfer removed meanwhile is never stored again.
//!
//! The stored record is read and replaced in one transaction, then the
//! priorities are applied to the live session. A storage failure leaves
//! both untouched.
use std::sync::Arc;

use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_primitives::priority::Priority;
use tracing::debug;

use super::databases;
use super::descriptor::SelectionChange;
use super::error::Error;
use super::registry::SessionHandle;
use super::transport::TransferFile;
use super::Engine;

/// The files a selection was applied to.
pub struct Selection {
    pub handle: Arc<SessionHandle>,
    pub priority: Priority,
    pub files: Vec<Arc<dyn TransferFile>>,
}

impl Engine {
    /// It starts downloading the files, with the `normal` priority.
    ///
    /// # Errors
    ///
    /// See [`Engine::set_priority`].
    pub async fn select_files(&self, info_hash: &InfoHash, all_files: bool, paths: &[String]) -> Result<Selection, Error> {
        self.set_priority(info_hash, all_files, paths, Priority::Normal).await
    }

    /// It sets the priority of the files.
    ///
    /// # Errors
    ///
    /// Will return:
    ///
    /// - `Error::InvalidArgument` if there is nothing to select.
    /// - `Error::TorrentNotFound` if the transfer is not registered.
    /// - `Error::Storage` if the selection can not be persisted.
    pub async fn set_priority(
        &self,
        info_hash: &InfoHash,
        all_files: bool,
        paths: &[String],
        priority: Priority,
    ) -> Result<Selection, Error> {
        if !all_files && paths.is_empty() {
            return Err(Error::invalid_argument("No files provided"));
        }

        let _lock = self.registry.lock(info_hash).await;

        let handle = self.get_torrent(info_hash)?;

        let files: Vec<Arc<dyn TransferFile>> = if all_files {
            handle.session().files()
        } else {
            let available = handle.session().files();

            paths
                .iter()
                .filter_map(|path| available.iter().find(|file| &file.path() == path).cloned())
                .collect()
        };

        let change = SelectionChange {
            all_files,
            paths: files.iter().map(|file| file.path()).collect(),
            priority,
        };

        let descriptor = match self.database.update_torrent_selection(info_hash, &change) {
            Ok(descriptor) => descriptor,
            // Added with `Persist::Skip` and never stored yet. Still
            // registered, removes wait for the lock.
            Err(databases::error::Error::RecordNotFound { .. }) => {
                let mut descriptor = handle.descriptor();
                descriptor.apply_selection(&change);
                self.database.save_torrent_spec(&descriptor)?;
                descriptor
            }
            Err(err) => return Err(err.into()),
        };

        for file in &files {
            file.set_priority(priority);
        }

        handle.replace_descriptor(descriptor);

        debug!("Priority {priority} set on {} file(s) of {info_hash}", files.len());

        Ok(Selection { handle, priority, files })
    }
}
