//! Job that samples the transfer rates on intervals.
//!
//! Every `engine.throughput_interval` it computes the download and upload
//! rates of every transfer from the byte counters of the transport. A late
//! tick is not caught up with a burst of samples: the next one is delayed and
//! the rates are computed over the time that really elapsed.
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::core::Engine;

/// It starts the sampler. It stops on `ctrl_c` or when the engine is
/// dropped.
#[must_use]
pub fn start_job(engine: &Arc<Engine>) -> JoinHandle<()> {
    let weak_engine = std::sync::Arc::downgrade(engine);
    let period = engine.throughput_interval();

    tokio::spawn(async move {
        let mut interval = sampling_interval(period);
        interval.tick().await;

        let mut last_sample = Instant::now();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(target: "THROUGHPUT", "Stopping throughput sampler job..");
                    break;
                }
                _ = interval.tick() => {
                    if let Some(engine) = weak_engine.upgrade() {
                        let now = Instant::now();
                        engine.sample_throughput(now - last_sample);
                        last_sample = now;

                        tracing::trace!(target: "THROUGHPUT", "Sampled throughput of {} torrents", engine.torrents().len());
                    } else {
                        break;
                    }
                }
            }
        }
    })
}

fn sampling_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
