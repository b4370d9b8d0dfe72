//! JSON-lines report replay.
//!
//! Feeds a recorded stream of decoded reports into a [`DeviceSession`].  Each
//! line is one [`DeviceReport`] plus an optional `delay_ms` to wait before
//! submitting it:
//!
//! ```json
//! {"position":[1000.0,1000.0],"pressure":300}
//! {"position":[1010.0,1004.0],"pressure":320,"delay_ms":5}
//! {"out_of_range":true,"delay_ms":5}
//! ```
//!
//! Blank lines are ignored.  Malformed lines are logged and skipped so one
//! corrupt record does not end the replay.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tablet_core::{DeviceReport, OutputMode};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::application::session::{DeviceSession, SessionError};

/// Error type for replay operations.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading the input stream failed.
    #[error("I/O error reading report stream: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid report record.
    #[error("line {line}: invalid report record: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The session stopped accepting reports.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// One line of a replay file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    #[serde(flatten)]
    pub report: DeviceReport,
    /// Pause before this report is submitted.
    #[serde(default)]
    pub delay_ms: u64,
}

/// Counters for a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub submitted: u64,
    pub skipped: u64,
}

/// Decodes one replay line; `line` is its 1-based number.
///
/// # Errors
///
/// Returns [`ReplayError::Decode`] when the JSON does not describe a report.
pub fn parse_line(text: &str, line: usize) -> Result<ReplayRecord, ReplayError> {
    serde_json::from_str(text).map_err(|source| ReplayError::Decode { line, source })
}

/// Replays every record from `reader` into `session`.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] if reading fails and [`ReplayError::Session`]
/// if the session stops before the stream ends.
pub async fn replay<R, M>(
    reader: R,
    session: &DeviceSession<M>,
) -> Result<ReplayStats, ReplayError>
where
    R: AsyncBufRead + Unpin,
    M: OutputMode + 'static,
{
    let mut lines = reader.lines();
    let mut stats = ReplayStats::default();
    let mut line = 0usize;

    while let Some(text) = lines.next_line().await? {
        line += 1;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let record = match parse_line(text, line) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "skipping malformed report");
                stats.skipped += 1;
                continue;
            }
        };

        if record.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(record.delay_ms)).await;
        }
        session.submit(record.report)?;
        stats.submitted += 1;
    }

    debug!(?stats, device = session.device_name(), "replay finished");
    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
