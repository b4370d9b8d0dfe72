//! Transform geometry for the relative output mode.
//!
//! The matrix maps a logical device coordinate to the space in which relative
//! deltas are measured:
//!
//! ```text
//! M = Scale(sensitivity.x * width / max_x, sensitivity.y * height / max_y) ∘ Rotation(-rotation)
//! ```
//!
//! Rotation is applied first, then the calibrated scale.  The result is a
//! cached value; callers recompute it only when sensitivity, rotation, or the
//! device calibration changes.

use glam::{Affine2, Vec2};

use crate::device::DigitizerSpecifications;

/// Millimetres per logical unit assumed for an axis whose calibration is unknown.
pub const FALLBACK_UNIT_SCALE: f32 = 0.01;

/// Computes the transform matrix for the given settings and calibration.
///
/// Never fails: an axis whose calibration is missing or unusable falls back to
/// [`FALLBACK_UNIT_SCALE`].  Identical inputs always produce bit-identical
/// matrices.
pub fn compute_matrix(
    sensitivity: Vec2,
    rotation: f32,
    calibration: Option<&DigitizerSpecifications>,
) -> Affine2 {
    let rotation = Affine2::from_angle(-rotation.to_radians());
    Affine2::from_scale(sensitivity * unit_scale(calibration)) * rotation
}

/// Physical millimetres per logical unit on each axis.
pub fn unit_scale(calibration: Option<&DigitizerSpecifications>) -> Vec2 {
    let x = calibration.and_then(|d| axis_ratio(d.width, d.max_x));
    let y = calibration.and_then(|d| axis_ratio(d.height, d.max_y));
    Vec2::new(
        x.unwrap_or(FALLBACK_UNIT_SCALE),
        y.unwrap_or(FALLBACK_UNIT_SCALE),
    )
}

/// `physical / max`, or `None` when the pair does not describe a usable axis.
fn axis_ratio(physical: f32, max: f32) -> Option<f32> {
    if max == 0.0 {
        return None;
    }
    let ratio = physical / max;
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
