//! Recording pointer sink for tests.
//!
//! Available to this crate's unit tests and, through the `testing` feature,
//! to downstream test suites.  Every call lands in a shared log; clones share
//! it, so a test keeps one clone while a session worker owns the other:
//!
//! ```ignore
//! let sink = RecordingPointer::new();
//! let recorded = sink.clone();
//! let mut mode = RelativeOutputMode::new(device, sink, config)?;
//! mode.handle(DeviceReport::at(Vec2::ZERO));
//! assert_eq!(recorded.calls(), vec![PointerCall::Position(Vec2::ZERO), PointerCall::Flush]);
//! ```

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

use crate::pointer::{
    EraserHandler, HoverDistanceHandler, PointerCapability, PointerSink, PositionHandler,
    PressureHandler, ProximityHandler, SynchronousPointer, TiltHandler,
};

/// One call received by a [`RecordingPointer`].
#[derive(Debug, Clone, PartialEq)]
pub enum PointerCall {
    Position(Vec2),
    Pressure(f32),
    Tilt(Vec2),
    Proximity(bool),
    HoverDistance(u32),
    Eraser(bool),
    Reset,
    Flush,
}

/// Records every call in order; exposes only the configured capabilities.
#[derive(Debug, Clone)]
pub struct RecordingPointer {
    calls: Arc<Mutex<Vec<PointerCall>>>,
    capabilities: Vec<PointerCapability>,
}

impl RecordingPointer {
    /// A sink supporting every capability.
    pub fn new() -> Self {
        Self::with_capabilities(&[
            PointerCapability::Position,
            PointerCapability::Pressure,
            PointerCapability::Tilt,
            PointerCapability::Proximity,
            PointerCapability::HoverDistance,
            PointerCapability::Eraser,
            PointerCapability::Synchronous,
        ])
    }

    pub fn with_capabilities(capabilities: &[PointerCapability]) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            capabilities: capabilities.to_vec(),
        }
    }

    /// Snapshot of every call recorded so far, in order.
    pub fn calls(&self) -> Vec<PointerCall> {
        self.calls.lock().clone()
    }

    /// Only the positions, in order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PointerCall::Position(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PointerCall) {
        self.calls.lock().push(call);
    }

    fn supports(&self, capability: PointerCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl Default for RecordingPointer {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionHandler for RecordingPointer {
    fn set_position(&mut self, position: Vec2) {
        self.record(PointerCall::Position(position));
    }
}

impl PressureHandler for RecordingPointer {
    fn set_pressure(&mut self, pressure: f32) {
        self.record(PointerCall::Pressure(pressure));
    }
}

impl TiltHandler for RecordingPointer {
    fn set_tilt(&mut self, tilt: Vec2) {
        self.record(PointerCall::Tilt(tilt));
    }
}

impl ProximityHandler for RecordingPointer {
    fn set_proximity(&mut self, near: bool) {
        self.record(PointerCall::Proximity(near));
    }
}

impl HoverDistanceHandler for RecordingPointer {
    fn set_hover_distance(&mut self, distance: u32) {
        self.record(PointerCall::HoverDistance(distance));
    }
}

impl EraserHandler for RecordingPointer {
    fn set_eraser(&mut self, eraser: bool) {
        self.record(PointerCall::Eraser(eraser));
    }
}

impl SynchronousPointer for RecordingPointer {
    fn reset(&mut self) {
        self.record(PointerCall::Reset);
    }

    fn flush(&mut self) {
        self.record(PointerCall::Flush);
    }
}

impl PointerSink for RecordingPointer {
    fn position(&mut self) -> Option<&mut dyn PositionHandler> {
        if self.supports(PointerCapability::Position) {
            Some(self)
        } else {
            None
        }
    }

    fn pressure(&mut self) -> Option<&mut dyn PressureHandler> {
        if self.supports(PointerCapability::Pressure) {
            Some(self)
        } else {
            None
        }
    }

    fn tilt(&mut self) -> Option<&mut dyn TiltHandler> {
        if self.supports(PointerCapability::Tilt) {
            Some(self)
        } else {
            None
        }
    }

    fn proximity(&mut self) -> Option<&mut dyn ProximityHandler> {
        if self.supports(PointerCapability::Proximity) {
            Some(self)
        } else {
            None
        }
    }

    fn hover_distance(&mut self) -> Option<&mut dyn HoverDistanceHandler> {
        if self.supports(PointerCapability::HoverDistance) {
            Some(self)
        } else {
            None
        }
    }

    fn eraser(&mut self) -> Option<&mut dyn EraserHandler> {
        if self.supports(PointerCapability::Eraser) {
            Some(self)
        } else {
            None
        }
    }

    fn synchronous(&mut self) -> Option<&mut dyn SynchronousPointer> {
        if self.supports(PointerCapability::Synchronous) {
            Some(self)
        } else {
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
