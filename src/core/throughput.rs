//! Transfer rates derived from cumulative byte counters.
//!
//! The transport only exposes monotonically increasing counters. Each sample
//! compares them with the previous sample, so a rate is always relative to
//! the last tick and never a long-run average.
use std::time::Duration;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throughput {
    pub last_downloaded: u64,
    pub last_uploaded: u64,
    /// Bytes per second.
    pub download_rate: u64,
    /// Bytes per second.
    pub upload_rate: u64,
}

impl Throughput {
    /// Starts counting from the current counters, with zero rates.
    #[must_use]
    pub fn starting_at(downloaded: u64, uploaded: u64) -> Self {
        Self {
            last_downloaded: downloaded,
            last_uploaded: uploaded,
            download_rate: 0,
            upload_rate: 0,
        }
    }

    /// Takes a new sample, `interval` after the previous one.
    pub fn sample(&mut self, downloaded: u64, uploaded: u64, interval: Duration) {
        self.download_rate = rate(self.last_downloaded, downloaded, interval);
        self.upload_rate = rate(self.last_uploaded, uploaded, interval);
        self.last_downloaded = downloaded;
        self.last_uploaded = uploaded;
    }
}

/// A counter going backwards (a restarted session) yields a zero rate.
fn rate(previous: u64, current: u64, interval: Duration) -> u64 {
    let delta = u128::from(current.saturating_sub(previous));
    let millis = interval.as_millis().max(1);

    u64::try_from(delta * 1000 / millis).unwrap_or(u64::MAX)
}
