//! Configurations for tests.
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use camino::Utf8PathBuf;
use torrenttp_configuration::{Configuration, Threshold, TransportDriver};

use crate::random;

/// This configuration is used for testing. It generates random config values
/// so they do not collide if you run more than one service at the same time.
///
/// - The API listens on an ephemeral port on the loopback interface.
/// - The spec store is a new `SQLite` file in the temp directory.
/// - Downloads go to a new directory in the temp directory.
/// - Torrents come from the in-process memory transport.
/// - Authentication is disabled.
///
/// # Panics
///
/// Will panic if the temp directory is not a valid UTF-8 path.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    // Ephemeral socket address for the API
    let api_port = 0u16;
    config.http_api.bind_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), api_port);
    config.http_api.auth.enabled = false;

    // In-process transport, the tests never reach a real swarm
    config.engine.transport = TransportDriver::Memory;

    // Short metadata wait so a stuck transfer does not hang the test suite
    config.engine.metadata_timeout = 5;
    config.engine.throughput_interval = 100;

    let temp_directory = Utf8PathBuf::from_path_buf(env::temp_dir()).expect("the temp directory should be valid UTF-8");
    let random_id = random::string(16);

    // Ephemeral sqlite database
    config.database.path = temp_directory.join(format!("torrenttp_{random_id}.db")).into_string();

    // Ephemeral download directory
    config.engine.data_dir = temp_directory.join(format!("torrenttp_{random_id}_downloads"));

    config
}

/// Ephemeral configuration with the shared secret authentication enabled.
#[must_use]
pub fn ephemeral_with_auth(key: &str) -> Configuration {
    let mut config = ephemeral();

    config.http_api.auth.enabled = true;
    config.http_api.override_key(key);

    config
}

/// Ephemeral configuration with uploads disabled.
#[must_use]
pub fn ephemeral_with_no_upload() -> Configuration {
    let mut config = ephemeral();

    config.engine.no_upload = true;

    config
}
