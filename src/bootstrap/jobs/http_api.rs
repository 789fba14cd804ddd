//! HTTP API job starter.
//!
//! The [`http_api::start_job`](crate::bootstrap::jobs::http_api::start_job)
//! function binds the API and spawns a task that keeps it running until a
//! shutdown signal arrives.
//!
//! The socket is bound before the function returns, so a busy port fails
//! the start of the application instead of a background task.
use std::sync::Arc;

use tokio::task::JoinHandle;
use torrenttp_configuration::HttpApi;
use tracing::info;

use crate::core::auth::Gate;
use crate::core::Engine;
use crate::servers::apis::server::{ApiServer, Launcher};

/// It starts a new API server with the provided configuration.
///
/// # Panics
///
/// It would panic if the address can not be bound.
#[must_use]
pub fn start_job(config: &HttpApi, engine: Arc<Engine>, gate: Arc<Gate>) -> JoinHandle<()> {
    let server = match ApiServer::new(Launcher::new(config.bind_address)).start(engine, gate) {
        Ok(server) => server,
        Err(err) => panic!("it should be able to start the API: {err}"),
    };

    info!(target: "API", "API bound to http://{}", server.state.binding);

    tokio::spawn(async move {
        // Keep the halt sender alive, dropping it would stop the server.
        let _halt = server.state.halt_task;

        if let Err(err) = server.state.task.await {
            tracing::error!(target: "API", "The API task failed: {err}");
        }
    })
}
