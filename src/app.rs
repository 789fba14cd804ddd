//! Torrenttp application.
//!
//! The application is a container for the jobs sharing one engine:
//!
//! - HTTP API: always started. A port that can not be bound stops the
//!   process.
//! - Recovery: recreates the stored transfers in the background.
//! - Throughput sampler: computes the transfer rates on intervals.
use std::sync::Arc;

use tokio::task::JoinHandle;
use torrenttp_configuration::Configuration;

use crate::bootstrap::jobs::{http_api, recovery, throughput};
use crate::core::auth::Gate;
use crate::core::Engine;

/// It starts every job and returns their handles.
///
/// # Panics
///
/// Will panic if the API can not bind its address.
#[must_use]
pub fn start(config: &Configuration, engine: Arc<Engine>, gate: Arc<Gate>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    // Start the API first, requests are accepted while transfers recover
    jobs.push(http_api::start_job(&config.http_api, engine.clone(), gate));

    jobs.push(recovery::start_job(&engine));

    jobs.push(throughput::start_job(&engine));

    jobs
}
