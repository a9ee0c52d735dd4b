use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use aguard_app::runtime::{self, FileSink, RuntimeOptions};

#[derive(Parser, Debug)]
#[command(
    name = "aguard",
    about = "Live acoustic monitor: loudness, anomaly events, and WAV capture"
)]
struct Cli {
    /// Input device name (default: system default input)
    #[arg(long)]
    device: Option<String>,

    /// Stop automatically after this many seconds
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Directory for saved recordings and event clips
    #[arg(long, default_value = "recordings")]
    output_dir: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    tracing::info!("Starting AcousticGuard monitor");
    let sink = Arc::new(FileSink {
        dir: cli.output_dir.clone(),
    });
    let handle = runtime::start(
        RuntimeOptions {
            device: cli.device.clone(),
        },
        sink,
    )
    .context("failed to start the capture session; check microphone availability and permissions")?;

    let cfg = handle.device_config();
    tracing::info!(
        "Capturing at {} Hz from a {}-channel device",
        cfg.sample_rate,
        cfg.channels
    );

    let mut snapshots = handle.subscribe();
    let stats_task = tokio::spawn(async move {
        let mut last_log = std::time::Instant::now();
        loop {
            match snapshots.recv().await {
                Ok(snapshot) => {
                    if last_log.elapsed() >= Duration::from_secs(2) {
                        tracing::info!(
                            "{:>3} dB [{}]  cur {} max {} min {} avg {}  events {}  rec {:.0}s",
                            snapshot.db,
                            snapshot.safety,
                            snapshot.stats.current,
                            snapshot.stats.max,
                            snapshot.stats.min,
                            snapshot.stats.avg,
                            snapshot.event_count,
                            snapshot.recording_secs
                        );
                        last_log = std::time::Instant::now();
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    match cli.duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                result = tokio::signal::ctrl_c() => result?,
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }

    tracing::info!("Stopping monitor");
    match handle.save() {
        Some(export) => {
            std::fs::create_dir_all(&cli.output_dir)?;
            let path = cli.output_dir.join(&export.suggested_filename);
            std::fs::write(&path, &export.bytes)?;
            tracing::info!(
                "Saved recording to {} ({} bytes)",
                path.display(),
                export.bytes.len()
            );
        }
        None => tracing::info!("No audio captured; nothing to save"),
    }

    handle.shutdown();
    stats_task.abort();
    Ok(())
}
