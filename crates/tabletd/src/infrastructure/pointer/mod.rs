//! Pointer sink implementations.
//!
//! [`TracingPointer`] is the daemon's default sink: it accumulates relative
//! motion into a virtual cursor and logs every committed frame.  Platform
//! sinks (uinput, compositor protocols) plug in behind the same
//! [`PointerSink`] trait.

use glam::Vec2;
use tablet_core::pointer::{
    EraserHandler, HoverDistanceHandler, PositionHandler, PressureHandler, ProximityHandler,
    SynchronousPointer, TiltHandler,
};
use tablet_core::PointerSink;
use tracing::{debug, info};

/// Pending state of the current frame, committed on flush.
#[derive(Debug, Default, Clone, PartialEq)]
struct Frame {
    motion: Vec2,
    pressure: Option<f32>,
    tilt: Option<Vec2>,
    near: Option<bool>,
    hover_distance: Option<u32>,
    eraser: Option<bool>,
}

/// Sink that logs frames instead of moving a real cursor.
#[derive(Debug, Default)]
pub struct TracingPointer {
    cursor: Vec2,
    frame: Frame,
    frames: u64,
}

impl TracingPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every delta committed so far.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Number of committed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PositionHandler for TracingPointer {
    fn set_position(&mut self, position: Vec2) {
        self.frame.motion += position;
    }
}

impl PressureHandler for TracingPointer {
    fn set_pressure(&mut self, pressure: f32) {
        self.frame.pressure = Some(pressure);
    }
}

impl TiltHandler for TracingPointer {
    fn set_tilt(&mut self, tilt: Vec2) {
        self.frame.tilt = Some(tilt);
    }
}

impl ProximityHandler for TracingPointer {
    fn set_proximity(&mut self, near: bool) {
        self.frame.near = Some(near);
    }
}

impl HoverDistanceHandler for TracingPointer {
    fn set_hover_distance(&mut self, distance: u32) {
        self.frame.hover_distance = Some(distance);
    }
}

impl EraserHandler for TracingPointer {
    fn set_eraser(&mut self, eraser: bool) {
        self.frame.eraser = Some(eraser);
    }
}

impl SynchronousPointer for TracingPointer {
    fn reset(&mut self) {
        debug!(cursor = ?self.cursor, "pointer reset, pen left range");
        self.frame = Frame::default();
    }

    fn flush(&mut self) {
        let frame = std::mem::take(&mut self.frame);
        self.cursor += frame.motion;
        self.frames += 1;
        info!(
            dx = frame.motion.x,
            dy = frame.motion.y,
            x = self.cursor.x,
            y = self.cursor.y,
            pressure = ?frame.pressure,
            tilt = ?frame.tilt,
            near = ?frame.near,
            hover_distance = ?frame.hover_distance,
            eraser = ?frame.eraser,
            "pointer frame"
        );
    }
}

impl PointerSink for TracingPointer {
    fn position(&mut self) -> Option<&mut dyn PositionHandler> {
        Some(self)
    }

    fn pressure(&mut self) -> Option<&mut dyn PressureHandler> {
        Some(self)
    }

    fn tilt(&mut self) -> Option<&mut dyn TiltHandler> {
        Some(self)
    }

    fn proximity(&mut self) -> Option<&mut dyn ProximityHandler> {
        Some(self)
    }

    fn hover_distance(&mut self) -> Option<&mut dyn HoverDistanceHandler> {
        Some(self)
    }

    fn eraser(&mut self) -> Option<&mut dyn EraserHandler> {
        Some(self)
    }

    fn synchronous(&mut self) -> Option<&mut dyn SynchronousPointer> {
        Some(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tablet_core::{dispatch, DeviceReport, PointerCapability};

    #[test]
    fn test_tracing_pointer_exposes_every_capability() {
        let mut sink = TracingPointer::new();
        assert_eq!(sink.capabilities().len(), 7);
        assert!(sink.capabilities().contains(&PointerCapability::Synchronous));
    }

    #[test]
    fn test_flush_commits_accumulated_motion() {
        // Arrange
        let mut sink = TracingPointer::new();

        // Act
        dispatch(&DeviceReport::at(Vec2::new(2.0, -1.0)), &mut sink, None);
        dispatch(&DeviceReport::at(Vec2::new(0.5, 0.5)), &mut sink, None);

        // Assert
        assert_eq!(sink.cursor(), Vec2::new(2.5, -0.5));
        assert_eq!(sink.frames(), 2);
    }

    #[test]
    fn test_reset_discards_pending_frame() {
        let mut sink = TracingPointer::new();
        sink.set_position(Vec2::new(9.0, 9.0));
        sink.reset();
        sink.flush();
        assert_eq!(sink.cursor(), Vec2::ZERO);
    }
}
