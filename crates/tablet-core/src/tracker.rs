//! Relative delta tracking.
//!
//! [`DeltaTracker`] turns successive absolute positions into relative motion.
//! Two policies decide what a report produces:
//!
//! - **Staleness**: if at least `reset_time` passed since the previous report,
//!   the pen is assumed to have been lifted and moved; the report yields a
//!   zero vector instead of a jump.
//! - **Suppression**: the first report after a matrix change yields nothing at
//!   all, because the stored position was computed with the old matrix.
//!
//! Both policies still update the stored position and restart the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use tracing::trace;

use crate::transform::TransformSnapshot;

/// Measures the gap between consecutive reports.
pub trait Stopwatch: Send {
    /// Returns the time since the previous call (or since creation) and
    /// starts a new interval.
    fn restart(&mut self) -> Duration;
}

/// Production stopwatch backed by [`Instant`].
#[derive(Debug)]
pub struct MonotonicStopwatch {
    started: Instant,
}

impl MonotonicStopwatch {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for MonotonicStopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch for MonotonicStopwatch {
    fn restart(&mut self) -> Duration {
        let now = Instant::now();
        // saturates to zero if the clock misbehaves
        let elapsed = now.saturating_duration_since(self.started);
        self.started = now;
        elapsed
    }
}

/// Stopwatch that reports whatever elapsed time was last set on it.
///
/// Clones share the same value, so a test can keep one clone and adjust the
/// gap while the tracker owns the other.
#[derive(Debug, Clone, Default)]
pub struct ManualStopwatch {
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualStopwatch {
    pub fn new(elapsed: Duration) -> Self {
        let stopwatch = Self::default();
        stopwatch.set_elapsed(elapsed);
        stopwatch
    }

    /// Sets the gap reported by every following `restart`.
    pub fn set_elapsed(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.store(nanos, Ordering::Relaxed);
    }
}

impl Stopwatch for ManualStopwatch {
    fn restart(&mut self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::Relaxed))
    }
}

/// Converts absolute positions into relative deltas.
#[derive(Debug)]
pub struct DeltaTracker<S: Stopwatch = MonotonicStopwatch> {
    last_position: Option<Vec2>,
    stopwatch: S,
    observed_generation: Option<u64>,
    suppress_next: bool,
}

impl DeltaTracker<MonotonicStopwatch> {
    pub fn new() -> Self {
        Self::with_stopwatch(MonotonicStopwatch::new())
    }
}

impl Default for DeltaTracker<MonotonicStopwatch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Stopwatch> DeltaTracker<S> {
    /// A tracker that adopts the generation of the first snapshot it sees.
    pub fn with_stopwatch(stopwatch: S) -> Self {
        Self {
            last_position: None,
            stopwatch,
            observed_generation: None,
            suppress_next: false,
        }
    }

    /// A tracker bound to a transform currently at `generation`.
    ///
    /// Any change after this point, including one made before the first
    /// report, suppresses the next report.
    pub fn with_stopwatch_at(stopwatch: S, generation: u64) -> Self {
        Self {
            observed_generation: Some(generation),
            ..Self::with_stopwatch(stopwatch)
        }
    }

    /// Processes one absolute position in logical device coordinates.
    ///
    /// Returns `Some(delta)` for a report that should be emitted (the zero
    /// vector when the report is stale) and `None` when the report must be
    /// dropped because the matrix just changed.
    pub fn process(&mut self, position: Vec2, transform: &TransformSnapshot) -> Option<Vec2> {
        let elapsed = self.stopwatch.restart();
        self.observe(transform.generation);

        let transformed = transform.matrix.transform_point2(position);
        let delta = self
            .last_position
            .map_or(Vec2::ZERO, |last| transformed - last);
        self.last_position = Some(transformed);

        if std::mem::take(&mut self.suppress_next) {
            trace!(generation = transform.generation, "report suppressed after transform change");
            return None;
        }

        if elapsed < transform.reset_time {
            Some(delta)
        } else {
            trace!(?elapsed, "stale report, motion reset");
            Some(Vec2::ZERO)
        }
    }

    /// Forgets the last known position; the next report yields zero motion.
    pub fn reset(&mut self) {
        self.last_position = None;
    }

    /// Arms suppression when the matrix generation moved since the last report.
    fn observe(&mut self, generation: u64) {
        if let Some(seen) = self.observed_generation {
            if seen != generation {
                self.suppress_next = true;
            }
        }
        self.observed_generation = Some(generation);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
