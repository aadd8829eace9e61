//! Connect to an aircraft and print telemetry (and optionally video stats).
//!
//! Does not fly: only the `command` handshake and, with `--video`,
//! `streamon`/`streamoff` are sent.
//!
//! Usage:
//!   cargo run --example monitor -- [OPTIONS]
//!
//! Options:
//!   -c, --config <PATH>   YAML client configuration (default: built-in)
//!   -r, --rate <HZ>       Telemetry print rate (default: 2)
//!   -s, --seconds <N>     How long to monitor (default: 30)
//!   --video               Enable the video stream and report unit sizes

use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use futures::StreamExt;
use tellolink::{ClientConfig, Tello, UpdateRate};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<String>,
    rate: u32,
    seconds: u64,
    video: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args { config: None, rate: 2, seconds: 30, video: false };

    let mut raw = env::args().skip(1);
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-c" | "--config" => args.config = Some(raw.next().context("--config needs a path")?),
            "-r" | "--rate" => {
                args.rate = raw.next().context("--rate needs a value")?.parse().context("invalid --rate")?;
            }
            "-s" | "--seconds" => {
                args.seconds =
                    raw.next().context("--seconds needs a value")?.parse().context("invalid --seconds")?;
            }
            "--video" => args.video = true,
            other => bail!("Unknown option: {other}"),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    let mut session = Tello::connect_with(config).await.context("handshake failed")?;
    info!("Connected, monitoring for {}s", args.seconds);

    if args.video {
        session.enable_video().await?;
        let mut units = session.video_stream();
        tokio::spawn(async move {
            while let Some(unit) = units.next().await {
                info!(sequence = unit.sequence, bytes = unit.len(), "Access unit");
            }
        });
    }

    let mut telemetry = Box::pin(session.telemetry(UpdateRate::Max(args.rate)));
    let deadline = tokio::time::sleep(Duration::from_secs(args.seconds));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            Some(snapshot) = telemetry.next() => {
                let (pitch, roll, yaw) = snapshot.attitude();
                println!(
                    "bat {:>3}%  h {:>4}cm  tof {:>4}cm  pitch {:>4}  roll {:>4}  yaw {:>4}  time {:>4}s",
                    snapshot.battery(),
                    snapshot.height(),
                    snapshot.tof,
                    pitch,
                    roll,
                    yaw,
                    snapshot.flight_time(),
                );
            }
        }
    }

    if args.video {
        let stats = session.video_stats();
        info!(units = stats.units, bytes = stats.total_bytes, evicted = stats.evicted, "Video summary");
    }
    session.close().await;
    Ok(())
}
