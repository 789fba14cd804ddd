use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use torrenttp_primitives::TransportDriver;

/// Settings handed to the transfer engine and its background jobs.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Engine {
    /// Transport used to move the torrent data.
    #[serde(default = "Engine::default_transport")]
    pub transport: TransportDriver,

    /// Directory where downloaded data is written.
    #[serde(default = "Engine::default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// When `true` the transport never uploads data to other peers. Every
    /// new transfer is created with the `disallow_data_upload` flag.
    #[serde(default = "Engine::default_no_upload")]
    pub no_upload: bool,

    /// Maximum time in seconds an add request waits for the transfer
    /// metadata before failing with a deadline error.
    #[serde(default = "Engine::default_metadata_timeout")]
    pub metadata_timeout: u64,

    /// Interval in milliseconds between two throughput samples.
    #[serde(default = "Engine::default_throughput_interval")]
    pub throughput_interval: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            transport: Self::default_transport(),
            data_dir: Self::default_data_dir(),
            no_upload: Self::default_no_upload(),
            metadata_timeout: Self::default_metadata_timeout(),
            throughput_interval: Self::default_throughput_interval(),
        }
    }
}

impl Engine {
    fn default_transport() -> TransportDriver {
        TransportDriver::Rqbit
    }

    fn default_data_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("./storage/torrenttp/downloads")
    }

    fn default_no_upload() -> bool {
        false
    }

    fn default_metadata_timeout() -> u64 {
        120
    }

    fn default_throughput_interval() -> u64 {
        1000
    }

    #[must_use]
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout)
    }

    /// Never zero, a zero interval would make the sampler spin.
    #[must_use]
    pub fn throughput_interval(&self) -> Duration {
        Duration::from_millis(self.throughput_interval.max(1))
    }
}
