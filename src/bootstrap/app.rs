//! Setup for the main application.
//!
//! 1. Load the configuration and apply the command line flags.
//! 2. Validate it. An invalid configuration stops the process.
//! 3. Initialize the logging.
//! 4. Build the transport, the engine and the authentication gate.
use std::sync::Arc;

use torrenttp_configuration::validator::Validator;
use torrenttp_configuration::{Configuration, TransportDriver};
use tracing::{info, warn};

use super::config::{initialize_configuration, Args};
use crate::bootstrap;
use crate::core::auth::{Gate, Mode};
use crate::core::services::engine_factory;
use crate::core::transport::memory::MemoryTransport;
use crate::core::transport::Transport;
use crate::core::Engine;

/// # Panics
///
/// Will panic if the configuration can not be loaded, is not valid, or the
/// spec store can not be opened.
#[must_use]
pub fn setup(args: &Args) -> (Arc<Configuration>, Arc<Engine>, Arc<Gate>) {
    let configuration = initialize_configuration(args);

    if let Err(err) = configuration.validate() {
        panic!("Configuration error: {err}");
    }

    let configuration = Arc::new(configuration);

    let (engine, gate) = initialize_with_configuration(&configuration);

    (configuration, engine, gate)
}

/// It builds the application services for an already loaded configuration.
#[must_use]
pub fn initialize_with_configuration(configuration: &Arc<Configuration>) -> (Arc<Engine>, Arc<Gate>) {
    initialize_logging(configuration);

    info!("Download directory is on: {}", configuration.engine.data_dir);
    if configuration.engine.no_upload {
        warn!("Upload is disabled");
    }

    let gate = Arc::new(Gate::from_config(&configuration.http_api.auth));

    match gate.mode() {
        Mode::Enabled => info!("API key authentication is {}", gate.mode()),
        Mode::Disabled => warn!("API key authentication is {}, the API is open to anyone who can reach it", gate.mode()),
    }

    (Arc::new(initialize_engine(configuration)), gate)
}

/// # Panics
///
/// Will panic if the configured transport was not compiled in.
#[must_use]
pub fn initialize_engine(configuration: &Arc<Configuration>) -> Engine {
    info!("Transport: {}", configuration.engine.transport);

    let transport: Arc<dyn Transport> = match configuration.engine.transport {
        TransportDriver::Rqbit => rqbit_transport(configuration),
        TransportDriver::Memory => Arc::new(
            MemoryTransport::new()
                .with_seed_dir(&configuration.engine.data_dir)
                .with_no_upload(configuration.engine.no_upload),
        ),
    };

    engine_factory(configuration, transport)
}

#[cfg(feature = "rqbit")]
fn rqbit_transport(configuration: &Arc<Configuration>) -> Arc<dyn Transport> {
    use crate::core::transport::rqbit::RqbitTransport;

    Arc::new(RqbitTransport::new(&configuration.engine.data_dir).with_no_upload(configuration.engine.no_upload))
}

#[cfg(not(feature = "rqbit"))]
fn rqbit_transport(_configuration: &Arc<Configuration>) -> Arc<dyn Transport> {
    panic!("The `rqbit` transport is not compiled in, rebuild with the `rqbit` feature or use the `memory` transport");
}

pub fn initialize_logging(configuration: &Arc<Configuration>) {
    bootstrap::logging::setup(&configuration.logging);
}
