//! Engine domain services.
//!
//! - [Torrent services](crate::core::services::torrent): read-only views of
//!   the registered transfers, used by the stats endpoints.
pub mod torrent;

use std::sync::Arc;

use torrenttp_configuration::Configuration;

use crate::core::transport::Transport;
use crate::core::Engine;

/// It returns a new engine building its dependencies.
///
/// # Panics
///
/// Will panic if the spec store can not be opened.
#[must_use]
pub fn engine_factory(config: &Configuration, transport: Arc<dyn Transport>) -> Engine {
    match Engine::new(config, transport) {
        Ok(engine) => engine,
        Err(error) => {
            panic!("{}", error)
        }
    }
}
