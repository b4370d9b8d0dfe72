//! Decoded device reports.
//!
//! A report carries any subset of the capabilities below.  Each capability is
//! an optional field, so "does this report have tilt?" is an explicit
//! presence check rather than a type inspection.
//!
//! Reports are serializable so recorded streams can be replayed:
//!
//! ```json
//! {"position":[1520.0,980.0],"pressure":412,"tilt":[12.0,-3.0]}
//! {"out_of_range":true}
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The kinds of data a report may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Position,
    Pressure,
    Tilt,
    Proximity,
    Eraser,
    OutOfRange,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Position,
        Capability::Pressure,
        Capability::Tilt,
        Capability::Proximity,
        Capability::Eraser,
        Capability::OutOfRange,
    ];
}

/// Pen proximity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proximity {
    /// `true` while the pen is close enough to be tracked precisely.
    pub near: bool,
    /// Raw hover distance reported by the device.
    pub hover_distance: u32,
}

/// One decoded hardware report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Absolute position in logical device coordinates.  After the relative
    /// transform this holds the delta instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    /// Raw pen pressure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<u32>,
    /// Pen tilt in degrees on each axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Proximity>,
    /// `true` while the eraser end is in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eraser: Option<bool>,
    /// The pen left the detection range.
    #[serde(default)]
    pub out_of_range: bool,
}

impl DeviceReport {
    /// A report carrying only an absolute position.
    pub fn at(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// A report signalling that the pen left the detection range.
    pub fn out_of_range() -> Self {
        Self {
            out_of_range: true,
            ..Self::default()
        }
    }

    pub fn with_pressure(mut self, pressure: u32) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn with_tilt(mut self, tilt: Vec2) -> Self {
        self.tilt = Some(tilt);
        self
    }

    pub fn with_proximity(mut self, near: bool, hover_distance: u32) -> Self {
        self.proximity = Some(Proximity {
            near,
            hover_distance,
        });
        self
    }

    pub fn with_eraser(mut self, eraser: bool) -> Self {
        self.eraser = Some(eraser);
        self
    }

    /// Returns `true` if this report carries `capability`.
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Position => self.position.is_some(),
            Capability::Pressure => self.pressure.is_some(),
            Capability::Tilt => self.tilt.is_some(),
            Capability::Proximity => self.proximity.is_some(),
            Capability::Eraser => self.eraser.is_some(),
            Capability::OutOfRange => self.out_of_range,
        }
    }

    /// Every capability this report carries, in [`Capability::ALL`] order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.has(*c))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
