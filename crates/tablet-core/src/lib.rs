//! # tablet-core
//!
//! Output-mode core for a userspace tablet driver: turns decoded absolute
//! position reports into pointer events and fans them out to a pointer sink.
//!
//! This crate has zero dependencies on OS APIs, device transports, or UI
//! frameworks.  Reports arrive already decoded; pointer sinks are supplied by
//! the caller.
//!
//! # Pipeline overview
//!
//! ```text
//! DeviceReport
//!   └─ OutputMode::transform   geometry (cached matrix) + delta tracking
//!        └─ None  → nothing is emitted for this report
//!        └─ Some  → dispatch::dispatch → PointerSink capabilities → flush
//! ```
//!
//! - **`geometry`** – Pure computation of the affine transform from
//!   sensitivity, rotation, and digitizer calibration.
//!
//! - **`tracker`** – Converts successive transformed positions into relative
//!   deltas, applying the staleness and suppression policies.
//!
//! - **`transform`** – The cached matrix and configuration shared between the
//!   configuration path and the report path.
//!
//! - **`report`** / **`pointer`** – Capability sets of incoming reports and
//!   outgoing pointer sinks.
//!
//! - **`dispatch`** – Routes each capability present on both sides, then
//!   synchronizes the sink.
//!
//! - **`output`** – The shared output-mode contract and the relative mode.

pub mod config;
pub mod device;
pub mod dispatch;
pub mod geometry;
pub mod output;
pub mod pointer;
pub mod report;
pub mod tracker;
pub mod transform;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export the most-used types at the crate root so callers can write
// `tablet_core::RelativeOutputMode` instead of the full module path.
pub use config::{ConfigError, RelativeModeConfig, RelativeModeSettings};
pub use device::{
    DeviceId, DigitizerSpecifications, InputDevice, PenSpecifications, TabletSpecifications,
};
pub use dispatch::dispatch;
pub use geometry::compute_matrix;
pub use output::{OutputMode, RelativeOutputMode};
pub use pointer::{PointerCapability, PointerSink};
pub use report::{Capability, DeviceReport, Proximity};
pub use tracker::{DeltaTracker, ManualStopwatch, MonotonicStopwatch, Stopwatch};
pub use transform::{ConfigHandle, TransformSnapshot};

pub use glam::{Affine2, Vec2};
