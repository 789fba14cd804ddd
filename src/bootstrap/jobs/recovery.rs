//! Job that recreates the transfers stored in the spec store.
//!
//! It runs in the background so the API accepts requests while transfers
//! wait for their metadata. When it finishes it logs how many records were
//! recovered, discarded or deferred to the next start.
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::Engine;

#[must_use]
pub fn start_job(engine: &Arc<Engine>) -> JoinHandle<()> {
    let engine = engine.clone();

    tokio::spawn(async move {
        info!(target: "RECOVERY", "Recovering stored torrents..");

        match engine.recover_all().await {
            Ok(report) => info!(
                target: "RECOVERY",
                "Recovered {} torrents, discarded {} records, deferred {}",
                report.recovered,
                report.discarded,
                report.deferred
            ),
            Err(err) => error!(target: "RECOVERY", "Unable to read the stored torrents: {err}"),
        }
    })
}
