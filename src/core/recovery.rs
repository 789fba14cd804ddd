//! Startup recovery.
//!
//! Every stored descriptor is handed back to the transport, without writing
//! it again. Records are independent: one failing record never stops the
//! pass.
//!
//! - A malformed record, or one the transport refuses, is deleted. A
//!   descriptor that can not be materialized is treated as permanently
//!   invalid, so it can not block the following passes.
//! - A record whose metadata does not arrive in time is kept: the swarm may
//!   simply be unreachable right now.
//! - A recovered transfer gets its remembered priorities back. When every
//!   file was selected, files not listed explicitly get `normal`.
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use torrenttp_primitives::priority::Priority;
use tracing::{info, warn};

use super::databases::Record;
use super::descriptor::TransferDescriptor;
use super::error::Error;
use super::registry::SessionHandle;
use super::{Engine, Persist};

/// What happened to the stored records.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    pub recovered: usize,
    pub discarded: usize,
    pub deferred: usize,
}

enum Outcome {
    Recovered,
    Discarded,
    Deferred,
}

impl Engine {
    /// It recreates every stored transfer.
    ///
    /// # Errors
    ///
    /// Will return `Error::Storage` if the spec store can not be read at all.
    pub async fn recover_all(&self) -> Result<RecoveryReport, Error> {
        let records = self.database.load_torrent_specs()?;

        let outcomes = join_all(records.into_iter().map(|record| self.recover(record))).await;

        let mut report = RecoveryReport::default();

        for outcome in outcomes {
            match outcome {
                Outcome::Recovered => report.recovered += 1,
                Outcome::Discarded => report.discarded += 1,
                Outcome::Deferred => report.deferred += 1,
            }
        }

        Ok(report)
    }

    async fn recover(&self, record: Record) -> Outcome {
        let descriptor = match record.spec {
            Ok(descriptor) => descriptor,
            Err(err) => {
                warn!("Cannot load spec \"{}\": {err}", record.key);
                self.discard(&record.key);
                return Outcome::Discarded;
            }
        };

        match self.add_torrent(descriptor.clone(), Persist::Skip).await {
            Ok(handle) => {
                let _lock = self.registry.lock(&descriptor.info_hash).await;

                // A concurrent remove may have won the lock first
                if self.registry.get(&descriptor.info_hash).is_some() {
                    restore_priorities(&handle, &descriptor);
                }

                info!("Torrent {} recovered", descriptor.info_hash);
                Outcome::Recovered
            }
            Err(Error::DeadlineExceeded { .. }) => {
                warn!("Torrent {} has no metadata yet, it will be retried on next start", descriptor.info_hash);
                Outcome::Deferred
            }
            Err(err) => {
                warn!("Cannot load spec \"{}\": {err}", record.key);
                self.discard(&record.key);
                Outcome::Discarded
            }
        }
    }

    fn discard(&self, key: &str) {
        if let Err(err) = self.database.remove_record(key) {
            warn!("Cannot remove spec \"{key}\": {err}");
        }
    }
}

fn restore_priorities(handle: &Arc<SessionHandle>, descriptor: &TransferDescriptor) {
    for file in handle.session().files() {
        match descriptor.priority_of(&file.path()) {
            Some(priority) => file.set_priority(priority),
            None if descriptor.selected_all => file.set_priority(Priority::Normal),
            None => {}
        }
    }
}
