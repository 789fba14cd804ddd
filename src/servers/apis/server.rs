//! Logic to run the HTTP API server.
//!
//! It contains two main structs: `ApiServer` and `Launcher`.
//!
//! The `ApiServer` struct is responsible for:
//!
//! - Starting and stopping the server.
//! - Keeping the state of the server: `running` or `stopped`.
//!
//! `ApiServer` relies on a launcher to start the actual server.
//!
//! 1. `ApiServer::start` binds the socket and spawns a new asynchronous task.
//! 2. `Launcher::start` runs the server on the spawned task until it is
//!    halted.
//!
//! The application starts the server once and lets it run until a shutdown
//! signal. The tests start and stop it several times.
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use derive_more::{Constructor, Display};
use tokio::sync::oneshot::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::routes::router;
use crate::core::auth::Gate;
use crate::core::Engine;
use crate::servers::signals::{graceful_shutdown, Halted};

/// Errors that can occur when starting or stopping the API server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unable to bind the API to {addr}: {source}")]
    UnableToBind { addr: SocketAddr, source: std::io::Error },

    #[error("Unable to get the local address of the API: {source}")]
    UnableToGetLocalAddress { source: std::io::Error },

    #[error("Unable to send the halt signal, the server task already finished")]
    UnableToHalt,

    #[error("The API server task failed: {source}")]
    TaskFailed { source: tokio::task::JoinError },
}

/// A HTTP API server controller.
///
/// It's a state machine. The launcher keeps the bind address, so a stopped
/// server always restarts with the same configuration.
pub struct ApiServer<S> {
    pub state: S,
}

/// A stopped API server state.
pub struct Stopped {
    launcher: Launcher,
}

/// A running API server state.
pub struct Running {
    /// The address the server is bound to. It differs from the configured
    /// one when the port is `0`.
    pub binding: SocketAddr,
    pub halt_task: Sender<Halted>,
    pub task: JoinHandle<Launcher>,
}

impl ApiServer<Stopped> {
    #[must_use]
    pub fn new(launcher: Launcher) -> Self {
        Self {
            state: Stopped { launcher },
        }
    }

    /// It binds the socket and starts serving on a new task.
    ///
    /// # Errors
    ///
    /// It would return an error if the address can not be bound.
    pub fn start(self, engine: Arc<Engine>, gate: Arc<Gate>) -> Result<ApiServer<Running>, Error> {
        let (tx_halt, rx_halt) = tokio::sync::oneshot::channel::<Halted>();

        let launcher = self.state.launcher;

        let listener = launcher.bind()?;

        let binding = listener
            .local_addr()
            .map_err(|source| Error::UnableToGetLocalAddress { source })?;

        let task = tokio::spawn(async move {
            launcher.start(listener, binding, engine, gate, rx_halt).await;

            launcher
        });

        Ok(ApiServer {
            state: Running {
                binding,
                halt_task: tx_halt,
                task,
            },
        })
    }
}

impl ApiServer<Running> {
    /// It stops the server and returns it in `stopped` state.
    ///
    /// # Errors
    ///
    /// It would return an error if the halt channel was closed or the server
    /// task panicked.
    pub async fn stop(self) -> Result<ApiServer<Stopped>, Error> {
        self.state.halt_task.send(Halted::Normal).map_err(|_| Error::UnableToHalt)?;

        let launcher = self.state.task.await.map_err(|source| Error::TaskFailed { source })?;

        Ok(ApiServer {
            state: Stopped { launcher },
        })
    }
}

/// It knows how to run the API server with graceful shutdown.
#[derive(Constructor, Clone, Copy, Debug, Display)]
#[display("intended_address: {bind_to}")]
pub struct Launcher {
    bind_to: SocketAddr,
}

impl Launcher {
    fn bind(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(self.bind_to).map_err(|source| Error::UnableToBind {
            addr: self.bind_to,
            source,
        })?;

        listener.set_nonblocking(true).map_err(|source| Error::UnableToBind {
            addr: self.bind_to,
            source,
        })?;

        Ok(listener)
    }

    async fn start(&self, listener: TcpListener, binding: SocketAddr, engine: Arc<Engine>, gate: Arc<Gate>, rx_halt: Receiver<Halted>) {
        let app = router(engine, gate);

        let handle = axum_server::Handle::new();

        tokio::task::spawn(graceful_shutdown(
            handle.clone(),
            rx_halt,
            format!("Shutting down API server on http://{binding}"),
        ));

        info!(target: "API", "Starting on http://{binding}");

        let served = axum_server::from_tcp(listener)
            .handle(handle)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await;

        match served {
            Ok(()) => info!(target: "API", "Stopped server running on http://{binding}"),
            Err(err) => error!(target: "API", "Server on http://{binding} failed: {err}"),
        }
    }
}
