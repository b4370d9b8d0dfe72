//! # tabletd
//!
//! Daemon side of the tablet driver.  The output mode core lives in
//! `tablet-core`; this crate wires it to report sources and pointer sinks.
//!
//! ```text
//! report source (JSON lines)
//!   └─ DeviceSession::submit   per-device queue
//!        └─ worker thread → RelativeOutputMode::handle → PointerSink
//! ```
//!
//! - **`application`** – Device sessions: one worker per device.
//! - **`infrastructure`** – Settings loading, report replay, pointer sinks.

pub mod application;
pub mod infrastructure;
