//! Pointer sink capabilities.
//!
//! A pointer sink is whatever finally receives processed pen data: a virtual
//! mouse, a uinput tablet, a compositor protocol.  Sinks differ in what they
//! can accept, so each kind of data has its own small handler trait and the
//! sink exposes the handlers it implements through accessor methods.  The
//! accessors default to `None`; a sink overrides only the ones it supports:
//!
//! ```ignore
//! impl PointerSink for VirtualMouse {
//!     fn position(&mut self) -> Option<&mut dyn PositionHandler> {
//!         Some(self)
//!     }
//! }
//! ```

use glam::Vec2;

/// The kinds of data a pointer sink may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerCapability {
    Position,
    Pressure,
    Tilt,
    Proximity,
    HoverDistance,
    Eraser,
    Synchronous,
}

/// Receives the position (a relative delta for relative sinks).
pub trait PositionHandler {
    fn set_position(&mut self, position: Vec2);
}

/// Receives pressure normalized to `0.0..=1.0`.
pub trait PressureHandler {
    fn set_pressure(&mut self, pressure: f32);
}

pub trait TiltHandler {
    fn set_tilt(&mut self, tilt: Vec2);
}

/// Receives the near-proximity flag.
pub trait ProximityHandler {
    fn set_proximity(&mut self, near: bool);
}

pub trait HoverDistanceHandler {
    fn set_hover_distance(&mut self, distance: u32);
}

pub trait EraserHandler {
    fn set_eraser(&mut self, eraser: bool);
}

/// A sink that batches updates and commits them once per report.
#[cfg_attr(test, mockall::automock)]
pub trait SynchronousPointer {
    /// Returns the sink to its idle state (pen lifted, buttons released).
    fn reset(&mut self);
    /// Commits every update received since the previous flush.
    fn flush(&mut self);
}

/// An output pointer exposing any subset of the handler traits.
pub trait PointerSink: Send {
    fn position(&mut self) -> Option<&mut dyn PositionHandler> {
        None
    }

    fn pressure(&mut self) -> Option<&mut dyn PressureHandler> {
        None
    }

    fn tilt(&mut self) -> Option<&mut dyn TiltHandler> {
        None
    }

    fn proximity(&mut self) -> Option<&mut dyn ProximityHandler> {
        None
    }

    fn hover_distance(&mut self) -> Option<&mut dyn HoverDistanceHandler> {
        None
    }

    fn eraser(&mut self) -> Option<&mut dyn EraserHandler> {
        None
    }

    fn synchronous(&mut self) -> Option<&mut dyn SynchronousPointer> {
        None
    }

    /// Lists the capabilities this sink exposes.
    fn capabilities(&mut self) -> Vec<PointerCapability> {
        let mut caps = Vec::new();
        if self.position().is_some() {
            caps.push(PointerCapability::Position);
        }
        if self.pressure().is_some() {
            caps.push(PointerCapability::Pressure);
        }
        if self.tilt().is_some() {
            caps.push(PointerCapability::Tilt);
        }
        if self.proximity().is_some() {
            caps.push(PointerCapability::Proximity);
        }
        if self.hover_distance().is_some() {
            caps.push(PointerCapability::HoverDistance);
        }
        if self.eraser().is_some() {
            caps.push(PointerCapability::Eraser);
        }
        if self.synchronous().is_some() {
            caps.push(PointerCapability::Synchronous);
        }
        caps
    }
}

impl<P: PointerSink + ?Sized> PointerSink for Box<P> {
    fn position(&mut self) -> Option<&mut dyn PositionHandler> {
        (**self).position()
    }

    fn pressure(&mut self) -> Option<&mut dyn PressureHandler> {
        (**self).pressure()
    }

    fn tilt(&mut self) -> Option<&mut dyn TiltHandler> {
        (**self).tilt()
    }

    fn proximity(&mut self) -> Option<&mut dyn ProximityHandler> {
        (**self).proximity()
    }

    fn hover_distance(&mut self) -> Option<&mut dyn HoverDistanceHandler> {
        (**self).hover_distance()
    }

    fn eraser(&mut self) -> Option<&mut dyn EraserHandler> {
        (**self).eraser()
    }

    fn synchronous(&mut self) -> Option<&mut dyn SynchronousPointer> {
        (**self).synchronous()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
