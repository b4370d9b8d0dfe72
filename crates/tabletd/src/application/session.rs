//! DeviceSession: runs one output mode on a dedicated worker thread.
//!
//! Reports for a device are processed strictly one at a time, in arrival
//! order.  The report source enqueues through [`DeviceSession::submit`]; the
//! worker drains the queue and drives [`OutputMode::handle`].  Configuration
//! changes travel separately through the mode's config handle, so they never
//! wait behind queued reports.
//!
//! ```text
//! source ──submit──▶ mpsc queue ──▶ worker thread ──▶ OutputMode::handle ──▶ sink
//! ```
//!
//! Shutdown closes the queue.  The worker finishes every report already
//! queued, then exits and hands the output mode back.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tablet_core::{DeviceReport, OutputMode};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for device session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The worker is gone; the report was not queued.
    #[error("device session is stopped")]
    Stopped,

    /// The worker thread panicked while handling a report.
    #[error("device session worker panicked")]
    WorkerPanicked,

    /// The worker thread could not be started.
    #[error("failed to spawn session worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// A running output mode bound to one device.
pub struct DeviceSession<M: OutputMode + 'static> {
    device_name: String,
    sender: Option<mpsc::Sender<DeviceReport>>,
    worker: Option<JoinHandle<M>>,
}

impl<M: OutputMode + 'static> DeviceSession<M> {
    /// Moves `mode` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Spawn`] if the OS refuses to create the thread.
    pub fn spawn(mode: M) -> Result<Self, SessionError> {
        let device_name = mode.device().name.clone();
        let (sender, receiver) = mpsc::channel();

        let worker = thread::Builder::new()
            .name(format!("session-{device_name}"))
            .spawn(move || run_worker(mode, receiver))
            .map_err(SessionError::Spawn)?;

        info!(device = %device_name, "device session started");
        Ok(Self {
            device_name,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Queues one report for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Stopped`] if the worker has exited.
    pub fn submit(&self, report: DeviceReport) -> Result<(), SessionError> {
        let sender = self.sender.as_ref().ok_or(SessionError::Stopped)?;
        sender.send(report).map_err(|_| SessionError::Stopped)
    }

    /// Closes the queue, waits for queued reports to drain, and returns the
    /// output mode.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WorkerPanicked`] if the worker died.
    pub fn shutdown(mut self) -> Result<M, SessionError> {
        self.sender.take();
        let worker = self.worker.take().ok_or(SessionError::Stopped)?;
        let mode = worker.join().map_err(|_| SessionError::WorkerPanicked)?;
        info!(device = %self.device_name, "device session stopped");
        Ok(mode)
    }
}

impl<M: OutputMode + 'static> Drop for DeviceSession<M> {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(device = %self.device_name, "session worker panicked during drop");
            }
        }
    }
}

/// Worker loop: handles reports until every sender is dropped.
fn run_worker<M: OutputMode>(mut mode: M, receiver: mpsc::Receiver<DeviceReport>) -> M {
    debug!(mode = mode.plugin_name(), device = %mode.device().name, "session worker running");
    let mut handled: u64 = 0;
    for report in receiver {
        mode.handle(report);
        handled += 1;
    }
    debug!(handled, "session worker drained");
    mode
}

// ── Tests ─────────────────────────────────────────────────────────────────────
