//! Transform state shared between the configuration path and the report path.
//!
//! A settings UI may change sensitivity or rotation from its own thread while
//! reports keep flowing on the device thread.  Both sides go through a
//! [`ConfigHandle`]; the report path reads one [`TransformSnapshot`] per report,
//! taken under the same lock that guards updates, so a half-written matrix is
//! never observed.
//!
//! Every geometry change bumps a generation counter.  The delta tracker
//! compares generations to decide when to drop a report, which keeps the
//! configuration path write-only with respect to tracker state.

use std::sync::Arc;
use std::time::Duration;

use glam::{Affine2, Vec2};
use parking_lot::Mutex;
use tracing::debug;

use crate::config::{ConfigError, RelativeModeConfig};
use crate::device::DigitizerSpecifications;
use crate::geometry::compute_matrix;

/// A consistent view of the transform state for processing one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    pub matrix: Affine2,
    pub reset_time: Duration,
    /// Incremented each time the matrix is recomputed.
    pub generation: u64,
}

#[derive(Debug)]
struct TransformState {
    config: RelativeModeConfig,
    calibration: Option<DigitizerSpecifications>,
    matrix: Affine2,
    generation: u64,
}

impl TransformState {
    fn recompute(&mut self) {
        self.matrix = compute_matrix(
            self.config.sensitivity,
            self.config.rotation,
            self.calibration.as_ref(),
        );
        self.generation = self.generation.wrapping_add(1);
        debug!(
            generation = self.generation,
            sensitivity = ?self.config.sensitivity,
            rotation = self.config.rotation,
            "transform matrix recomputed"
        );
    }
}

/// Cloneable, thread-safe handle to an output mode's configuration.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    state: Arc<Mutex<TransformState>>,
}

impl ConfigHandle {
    /// Creates a handle with the matrix already computed for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(
        config: RelativeModeConfig,
        calibration: Option<DigitizerSpecifications>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let matrix = compute_matrix(config.sensitivity, config.rotation, calibration.as_ref());
        Ok(Self {
            state: Arc::new(Mutex::new(TransformState {
                config,
                calibration,
                matrix,
                generation: 0,
            })),
        })
    }

    /// Returns the matrix, reset time, and generation as one consistent copy.
    pub fn snapshot(&self) -> TransformSnapshot {
        let state = self.state.lock();
        TransformSnapshot {
            matrix: state.matrix,
            reset_time: state.config.reset_time,
            generation: state.generation,
        }
    }

    /// Returns the configuration currently in effect.
    pub fn config(&self) -> RelativeModeConfig {
        self.state.lock().config
    }

    /// Replaces the whole configuration, recomputes the matrix, and arms
    /// suppression of the next report.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation; the previous
    /// configuration stays in effect.
    pub fn set_config(&self, config: RelativeModeConfig) -> Result<(), ConfigError> {
        self.update_geometry(|current| *current = config)
    }

    /// Changes the sensitivity; behaves like [`set_config`](Self::set_config).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteSensitivity`] for NaN or infinite values.
    pub fn set_sensitivity(&self, sensitivity: Vec2) -> Result<(), ConfigError> {
        self.update_geometry(|config| config.sensitivity = sensitivity)
    }

    /// Changes the rotation; behaves like [`set_config`](Self::set_config).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteRotation`] for NaN or infinite values.
    pub fn set_rotation(&self, rotation: f32) -> Result<(), ConfigError> {
        self.update_geometry(|config| config.rotation = rotation)
    }

    /// Changes the reset time.  Geometry is untouched, so nothing is suppressed.
    pub fn set_reset_time(&self, reset_time: Duration) {
        let mut state = self.state.lock();
        state.config.reset_time = reset_time;
        debug!(?reset_time, "reset time changed");
    }

    /// Replaces the digitizer calibration and recomputes the matrix.
    pub fn set_calibration(&self, calibration: Option<DigitizerSpecifications>) {
        let mut state = self.state.lock();
        state.calibration = calibration;
        state.recompute();
    }

    /// Applies `edit` to a copy of the configuration and commits it, together
    /// with the recomputed matrix, under a single lock.
    fn update_geometry(
        &self,
        edit: impl FnOnce(&mut RelativeModeConfig),
    ) -> Result<(), ConfigError> {
        let mut state = self.state.lock();
        let mut config = state.config;
        edit(&mut config);
        config.validate()?;
        state.config = config;
        state.recompute();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> ConfigHandle {
        ConfigHandle::new(RelativeModeConfig::default(), None).unwrap()
    }

    #[test]
    fn test_new_handle_starts_at_generation_zero() {
        assert_eq!(handle().snapshot().generation, 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let cfg = RelativeModeConfig {
            rotation: f32::NAN,
            ..RelativeModeConfig::default()
        };
        assert!(ConfigHandle::new(cfg, None).is_err());
    }

    #[test]
    fn test_set_sensitivity_recomputes_matrix_and_bumps_generation() {
        // Arrange
        let h = handle();

        // Act
        h.set_sensitivity(Vec2::new(1.0, 2.0)).unwrap();

        // Assert
        let snap = h.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.matrix, compute_matrix(Vec2::new(1.0, 2.0), 0.0, None));
    }

    #[test]
    fn test_set_rotation_bumps_generation() {
        let h = handle();
        h.set_rotation(45.0).unwrap();
        assert_eq!(h.snapshot().generation, 1);
        assert_eq!(h.config().rotation, 45.0);
    }

    #[test]
    fn test_invalid_update_leaves_state_untouched() {
        // Arrange
        let h = handle();
        let before = h.snapshot();

        // Act
        let result = h.set_sensitivity(Vec2::new(f32::INFINITY, 1.0));

        // Assert
        assert!(result.is_err());
        assert_eq!(h.snapshot(), before);
    }

    #[test]
    fn test_set_reset_time_does_not_bump_generation() {
        let h = handle();
        h.set_reset_time(Duration::from_millis(40));
        let snap = h.snapshot();
        assert_eq!(snap.generation, 0);
        assert_eq!(snap.reset_time, Duration::from_millis(40));
    }

    #[test]
    fn test_set_calibration_recomputes_matrix() {
        // Arrange
        let h = handle();
        let cal = DigitizerSpecifications {
            width: 10.0,
            height: 10.0,
            max_x: 10.0,
            max_y: 10.0,
        };

        // Act
        h.set_calibration(Some(cal));

        // Assert
        let snap = h.snapshot();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.matrix, Affine2::from_scale(Vec2::splat(10.0)));
    }

    #[test]
    fn test_clones_share_state_across_threads() {
        // Arrange
        let h = handle();
        let remote = h.clone();

        // Act
        std::thread::spawn(move || remote.set_rotation(90.0).unwrap())
            .join()
            .unwrap();

        // Assert
        assert_eq!(h.config().rotation, 90.0);
        assert_eq!(h.snapshot().generation, 1);
    }
}
