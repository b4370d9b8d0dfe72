//! tabletd: userspace tablet daemon entry point.
//!
//! Replays a stream of decoded tablet reports through the relative output
//! mode and logs the resulting pointer frames.
//!
//! # Usage
//!
//! ```text
//! tabletd [OPTIONS]
//!
//! Options:
//!   --config <PATH>   TOML settings file (relative mode + device descriptor)
//!   --input  <PATH>   JSON-lines report stream, `-` for stdin [default: -]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable         | Default | Description                      |
//! |------------------|---------|----------------------------------|
//! | `TABLETD_CONFIG` | none    | Settings file path               |
//! | `TABLETD_INPUT`  | `-`     | Report stream path               |
//! | `RUST_LOG`       | `info`  | Log filter (`tracing` EnvFilter) |
//!
//! Ctrl+C stops the replay, drains the session, and exits without waiting
//! for a pending stdin read.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tablet_core::{OutputMode, RelativeModeConfig, RelativeOutputMode};
use tabletd::application::session::DeviceSession;
use tabletd::infrastructure::pointer::TracingPointer;
use tabletd::infrastructure::replay::{replay, ReplayStats};
use tabletd::infrastructure::settings::DaemonSettings;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Userspace tablet daemon.
#[derive(Debug, Parser)]
#[command(
    name = "tabletd",
    about = "Runs the relative output mode over a recorded tablet report stream",
    version
)]
struct Cli {
    /// TOML settings file.  Built-in defaults apply when omitted.
    #[arg(long, env = "TABLETD_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-lines report stream to replay; `-` reads standard input.
    #[arg(long, default_value = "-", env = "TABLETD_INPUT")]
    input: String,
}

impl Cli {
    /// Loads the settings file, or the defaults when none was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load_settings(&self) -> anyhow::Result<DaemonSettings> {
        match &self.config {
            Some(path) => DaemonSettings::load(path)
                .with_context(|| format!("failed to load settings from '{}'", path.display())),
            None => Ok(DaemonSettings::default()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run_detached(run(cli))?
}

/// Runs `future` to completion on a fresh runtime, then shuts the runtime
/// down without waiting for blocking tasks.
///
/// Reads from `tokio::io::stdin` run on the blocking pool and cannot be
/// cancelled; an interactive stdin would otherwise hold the process open
/// after Ctrl+C until the next line arrives.
fn run_detached<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.load_settings()?;

    let device = Arc::new(settings.device.to_input_device());
    let config = RelativeModeConfig::from(settings.relative.clone());
    let mode = RelativeOutputMode::new(device, TracingPointer::new(), config)
        .context("invalid relative mode settings")?;
    info!(
        mode = mode.plugin_name(),
        device = %mode.device().name,
        input = %cli.input,
        "tabletd starting"
    );

    let session = DeviceSession::spawn(mode).context("failed to start device session")?;

    // Ctrl+C abandons the rest of the stream; queued reports still drain.
    let outcome = tokio::select! {
        result = run_replay(&cli.input, &session) => Some(result),
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("received Ctrl+C, stopping replay"),
                Err(e) => warn!("failed to listen for Ctrl+C signal: {e}"),
            }
            None
        }
    };

    let pointer = session
        .shutdown()
        .context("device session failed")?
        .into_pointer();
    info!(
        frames = pointer.frames(),
        x = pointer.cursor().x,
        y = pointer.cursor().y,
        "tabletd stopped"
    );

    if let Some(result) = outcome {
        let stats = result?;
        info!(submitted = stats.submitted, skipped = stats.skipped, "replay complete");
    }
    Ok(())
}

/// Opens `input` and replays it into `session`.
async fn run_replay(
    input: &str,
    session: &DeviceSession<RelativeOutputMode<TracingPointer>>,
) -> anyhow::Result<ReplayStats> {
    if input == "-" {
        return replay(BufReader::new(tokio::io::stdin()), session)
            .await
            .context("failed to replay standard input");
    }

    let file = tokio::fs::File::open(input)
        .await
        .with_context(|| format!("failed to open report stream '{input}'"))?;
    replay(BufReader::new(file), session)
        .await
        .with_context(|| format!("failed to replay '{input}'"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
