//! Relative output mode configuration.
//!
//! [`RelativeModeConfig`] is the validated in-memory form used by the output
//! mode.  [`RelativeModeSettings`] is its serialized form, suitable for a TOML
//! settings table:
//!
//! ```toml
//! [relative]
//! sensitivity_x = 10.0
//! sensitivity_y = 10.0
//! rotation = 0.0
//! reset_time_ms = 100
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` fall back to
//! `some_fn()` when absent, so a partial table is always accepted.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default sensitivity on both axes, in output units per millimetre.
pub const DEFAULT_SENSITIVITY: f32 = 10.0;

/// Default gap after which relative motion is treated as discontinuous.
pub const DEFAULT_RESET_TIME: Duration = Duration::from_millis(100);

/// Error type for configuration updates.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// One of the sensitivity components is NaN or infinite.
    #[error("sensitivity must be finite, got ({x}, {y})")]
    NonFiniteSensitivity { x: f32, y: f32 },

    /// The rotation angle is NaN or infinite.
    #[error("rotation must be finite, got {0}")]
    NonFiniteRotation(f32),
}

/// Geometry and timing settings for the relative output mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeModeConfig {
    /// Output distance per physical millimetre travelled on the digitizer.
    pub sensitivity: Vec2,
    /// Rotation applied to input, in degrees.  The matrix rotates by the negated angle.
    pub rotation: f32,
    /// Reports separated by at least this long produce no motion.
    pub reset_time: Duration,
}

impl Default for RelativeModeConfig {
    fn default() -> Self {
        Self {
            sensitivity: Vec2::splat(DEFAULT_SENSITIVITY),
            rotation: 0.0,
            reset_time: DEFAULT_RESET_TIME,
        }
    }
}

impl RelativeModeConfig {
    /// Checks that every geometric value is usable for matrix computation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the sensitivity or rotation is NaN or infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sensitivity.is_finite() {
            return Err(ConfigError::NonFiniteSensitivity {
                x: self.sensitivity.x,
                y: self.sensitivity.y,
            });
        }
        if !self.rotation.is_finite() {
            return Err(ConfigError::NonFiniteRotation(self.rotation));
        }
        Ok(())
    }
}

/// Serialized form of [`RelativeModeConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelativeModeSettings {
    #[serde(default = "default_sensitivity")]
    pub sensitivity_x: f32,
    #[serde(default = "default_sensitivity")]
    pub sensitivity_y: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_reset_time_ms")]
    pub reset_time_ms: u64,
}

impl Default for RelativeModeSettings {
    fn default() -> Self {
        Self::from(&RelativeModeConfig::default())
    }
}

impl From<&RelativeModeConfig> for RelativeModeSettings {
    fn from(config: &RelativeModeConfig) -> Self {
        Self {
            sensitivity_x: config.sensitivity.x,
            sensitivity_y: config.sensitivity.y,
            rotation: config.rotation,
            reset_time_ms: u64::try_from(config.reset_time.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl From<RelativeModeSettings> for RelativeModeConfig {
    fn from(settings: RelativeModeSettings) -> Self {
        Self {
            sensitivity: Vec2::new(settings.sensitivity_x, settings.sensitivity_y),
            rotation: settings.rotation,
            reset_time: Duration::from_millis(settings.reset_time_ms),
        }
    }
}

fn default_sensitivity() -> f32 {
    DEFAULT_SENSITIVITY
}

fn default_reset_time_ms() -> u64 {
    DEFAULT_RESET_TIME.as_millis() as u64
}

// ── Tests ─────────────────────────────────────────────────────────────────────
