//! Device descriptors supplied by the device enumeration layer.
//!
//! The output mode never talks to hardware; it only reads the physical
//! specifications of the tablet it is bound to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an input device, derived from UUID v4.
pub type DeviceId = Uuid;

/// Physical size and logical coordinate range of a digitizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DigitizerSpecifications {
    /// Active area width in millimetres.
    pub width: f32,
    /// Active area height in millimetres.
    pub height: f32,
    /// Maximum logical X coordinate reported by the device.
    pub max_x: f32,
    /// Maximum logical Y coordinate reported by the device.
    pub max_y: f32,
}

/// Pen capabilities of a tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenSpecifications {
    /// Highest raw pressure value the pen reports.
    pub max_pressure: u32,
}

/// Everything the device reported about itself.  Any part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabletSpecifications {
    #[serde(default)]
    pub digitizer: Option<DigitizerSpecifications>,
    #[serde(default)]
    pub pen: Option<PenSpecifications>,
}

/// A tablet the output mode is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDevice {
    pub id: DeviceId,
    /// Human-readable name (e.g. the product string).
    pub name: String,
    pub specifications: TabletSpecifications,
}

impl InputDevice {
    /// Creates a descriptor with a freshly generated [`DeviceId`].
    pub fn new(name: impl Into<String>, specifications: TabletSpecifications) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            specifications,
        }
    }

    /// Digitizer calibration, if the device reported it.
    pub fn digitizer(&self) -> Option<&DigitizerSpecifications> {
        self.specifications.digitizer.as_ref()
    }

    /// Pen specifications, if the device reported them.
    pub fn pen(&self) -> Option<&PenSpecifications> {
        self.specifications.pen.as_ref()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
