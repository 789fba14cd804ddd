use clap::Parser;
use torrenttp::bootstrap::config::Args;
use torrenttp::{app, bootstrap};
use tracing::info;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let (config, engine, gate) = bootstrap::app::setup(&args);

    let jobs = app::start(&config, engine, gate);

    // handle the signals
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Torrenttp shutting down..");

            // Await for all jobs to shutdown
            futures::future::join_all(jobs).await;
            info!("Torrenttp successfully shutdown.");
        }
    }
}
