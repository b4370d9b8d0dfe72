//! Output modes.
//!
//! Every output mode follows the same two-step pipeline per report:
//!
//! 1. [`OutputMode::transform`] maps the report into the output space, or
//!    drops it by returning `None`.
//! 2. [`OutputMode::output`] hands a surviving report to the pointer sink.
//!
//! [`OutputMode::handle`] composes the two; a dropped report never reaches
//! the sink, not even for a flush.
//!
//! [`RelativeOutputMode`] is the relative variant: positions become deltas
//! measured in the transformed space.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use tracing::{debug, trace};

use crate::config::{ConfigError, RelativeModeConfig};
use crate::device::InputDevice;
use crate::dispatch::dispatch;
use crate::pointer::PointerSink;
use crate::report::DeviceReport;
use crate::tracker::{DeltaTracker, MonotonicStopwatch, Stopwatch};
use crate::transform::ConfigHandle;

/// The lifecycle shared by all output modes.
pub trait OutputMode: Send {
    /// Name under which the mode is registered with the plugin loader.
    fn plugin_name(&self) -> &'static str;

    /// The device this mode is bound to.
    fn device(&self) -> &InputDevice;

    /// Maps `report` into the output space, or returns `None` to drop it.
    fn transform(&mut self, report: DeviceReport) -> Option<DeviceReport>;

    /// Delivers a transformed report to the pointer sink.
    fn output(&mut self, report: &DeviceReport);

    /// Runs the full pipeline for one report.
    fn handle(&mut self, report: DeviceReport) {
        match self.transform(report) {
            Some(report) => self.output(&report),
            None => trace!("report dropped by transform"),
        }
    }
}

/// Relative output mode: reports pen motion as deltas.
pub struct RelativeOutputMode<P, S = MonotonicStopwatch>
where
    P: PointerSink,
    S: Stopwatch,
{
    device: Arc<InputDevice>,
    pointer: P,
    config: ConfigHandle,
    tracker: DeltaTracker<S>,
}

impl<P: PointerSink> RelativeOutputMode<P> {
    /// Binds `device` and `pointer` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(
        device: Arc<InputDevice>,
        pointer: P,
        config: RelativeModeConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_stopwatch(device, pointer, config, MonotonicStopwatch::new())
    }
}

impl<P: PointerSink, S: Stopwatch> RelativeOutputMode<P, S> {
    pub const PLUGIN_NAME: &'static str = "Relative Mode";

    /// Like [`new`](RelativeOutputMode::new) but measures report gaps with `stopwatch`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn with_stopwatch(
        device: Arc<InputDevice>,
        pointer: P,
        config: RelativeModeConfig,
        stopwatch: S,
    ) -> Result<Self, ConfigError> {
        let handle = ConfigHandle::new(config, device.digitizer().copied())?;
        let tracker = DeltaTracker::with_stopwatch_at(stopwatch, handle.snapshot().generation);
        debug!(device = %device.name, ?config, "relative output mode created");
        Ok(Self {
            device,
            pointer,
            config: handle,
            tracker,
        })
    }

    /// A handle for changing the configuration from another thread.
    pub fn config_handle(&self) -> ConfigHandle {
        self.config.clone()
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> RelativeModeConfig {
        self.config.config()
    }

    /// Replaces the configuration.  The next position report is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn set_config(&mut self, config: RelativeModeConfig) -> Result<(), ConfigError> {
        self.config.set_config(config)
    }

    /// Changes the sensitivity.  The next position report is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for NaN or infinite values.
    pub fn set_sensitivity(&mut self, sensitivity: Vec2) -> Result<(), ConfigError> {
        self.config.set_sensitivity(sensitivity)
    }

    /// Changes the rotation in degrees.  The next position report is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for NaN or infinite values.
    pub fn set_rotation(&mut self, rotation: f32) -> Result<(), ConfigError> {
        self.config.set_rotation(rotation)
    }

    pub fn set_reset_time(&mut self, reset_time: Duration) {
        self.config.set_reset_time(reset_time);
    }

    /// Rebinds to an updated descriptor of the same tablet and recomputes the
    /// matrix from its calibration.
    pub fn recalibrate(&mut self, device: Arc<InputDevice>) {
        self.config.set_calibration(device.digitizer().copied());
        self.device = device;
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut P {
        &mut self.pointer
    }

    /// Tears the mode down and releases the pointer sink.
    pub fn into_pointer(self) -> P {
        debug!(device = %self.device.name, "relative output mode torn down");
        self.pointer
    }
}

impl<P: PointerSink, S: Stopwatch> OutputMode for RelativeOutputMode<P, S> {
    fn plugin_name(&self) -> &'static str {
        Self::PLUGIN_NAME
    }

    fn device(&self) -> &InputDevice {
        &self.device
    }

    fn transform(&mut self, mut report: DeviceReport) -> Option<DeviceReport> {
        let Some(position) = report.position else {
            return Some(report);
        };
        let snapshot = self.config.snapshot();
        report.position = Some(self.tracker.process(position, &snapshot)?);
        Some(report)
    }

    fn output(&mut self, report: &DeviceReport) {
        dispatch(report, &mut self.pointer, self.device.pen());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DigitizerSpecifications, PenSpecifications, TabletSpecifications};
    use crate::testing::{PointerCall, RecordingPointer};
    use crate::tracker::ManualStopwatch;

    const FAST: Duration = Duration::from_millis(5);

    fn unit_device() -> Arc<InputDevice> {
        // width == max_x and height == max_y: one logical unit per millimetre.
        Arc::new(InputDevice::new(
            "unit-tablet",
            TabletSpecifications {
                digitizer: Some(DigitizerSpecifications {
                    width: 100.0,
                    height: 100.0,
                    max_x: 100.0,
                    max_y: 100.0,
                }),
                pen: Some(PenSpecifications { max_pressure: 100 }),
            },
        ))
    }

    fn unit_config() -> RelativeModeConfig {
        RelativeModeConfig {
            sensitivity: Vec2::ONE,
            ..RelativeModeConfig::default()
        }
    }

    fn make_mode() -> (
        RelativeOutputMode<RecordingPointer, ManualStopwatch>,
        ManualStopwatch,
    ) {
        let clock = ManualStopwatch::new(FAST);
        let mode = RelativeOutputMode::with_stopwatch(
            unit_device(),
            RecordingPointer::new(),
            unit_config(),
            clock.clone(),
        )
        .unwrap();
        (mode, clock)
    }

    fn positions(mode: &RelativeOutputMode<RecordingPointer, ManualStopwatch>) -> Vec<Vec2> {
        mode.pointer()
            .calls()
            .iter()
            .filter_map(|c| match c {
                PointerCall::Position(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn flushes(mode: &RelativeOutputMode<RecordingPointer, ManualStopwatch>) -> usize {
        mode.pointer()
            .calls()
            .iter()
            .filter(|c| **c == PointerCall::Flush)
            .count()
    }

    #[test]
    fn test_plugin_name_is_relative_mode() {
        let (mode, _) = make_mode();
        assert_eq!(mode.plugin_name(), "Relative Mode");
    }

    #[test]
    fn test_handle_emits_delta_between_consecutive_reports() {
        // Arrange
        let (mut mode, _) = make_mode();

        // Act
        mode.handle(DeviceReport::at(Vec2::new(0.0, 0.0)));
        mode.handle(DeviceReport::at(Vec2::new(3.0, 4.0)));

        // Assert
        assert_eq!(positions(&mode), vec![Vec2::ZERO, Vec2::new(3.0, 4.0)]);
        assert_eq!(flushes(&mode), 2);
    }

    #[test]
    fn test_sensitivity_change_suppresses_one_report_entirely() {
        // Arrange
        let (mut mode, _) = make_mode();
        mode.handle(DeviceReport::at(Vec2::new(10.0, 10.0)));

        // Act
        mode.set_sensitivity(Vec2::splat(2.0)).unwrap();
        mode.handle(DeviceReport::at(Vec2::new(11.0, 10.0)).with_pressure(50));
        let calls_after_suppressed = mode.pointer().calls().len();
        mode.handle(DeviceReport::at(Vec2::new(12.0, 11.0)));

        // Assert: the suppressed report produced no calls at all, not even a flush.
        assert_eq!(calls_after_suppressed, 2, "only the first report's position + flush");
        assert_eq!(positions(&mode), vec![Vec2::ZERO, Vec2::new(2.0, 2.0)]);
    }

    #[test]
    fn test_sensitivity_change_before_first_report_suppresses_it() {
        // Arrange
        let (mut mode, _) = make_mode();

        // Act
        mode.set_sensitivity(Vec2::splat(2.0)).unwrap();
        let dropped = mode.transform(DeviceReport::at(Vec2::new(5.0, 5.0)));
        let resumed = mode.transform(DeviceReport::at(Vec2::new(6.0, 5.0)));

        // Assert
        assert!(dropped.is_none());
        assert_eq!(resumed.and_then(|r| r.position), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_remote_change_before_first_report_drops_it_without_flush() {
        // Arrange
        let (mut mode, _) = make_mode();
        let remote = mode.config_handle();

        // Act
        remote.set_rotation(45.0).unwrap();
        mode.handle(DeviceReport::at(Vec2::new(5.0, 5.0)));

        // Assert
        assert!(mode.pointer().calls().is_empty());
    }

    #[test]
    fn test_first_report_after_construction_is_emitted() {
        let (mut mode, _) = make_mode();
        let first = mode.transform(DeviceReport::at(Vec2::new(5.0, 5.0)));
        assert_eq!(first.and_then(|r| r.position), Some(Vec2::ZERO));
    }

    #[test]
    fn test_rotation_change_from_handle_suppresses_next_report() {
        // Arrange
        let (mut mode, _) = make_mode();
        let remote = mode.config_handle();
        mode.handle(DeviceReport::at(Vec2::ZERO));

        // Act
        std::thread::spawn(move || remote.set_rotation(90.0).unwrap())
            .join()
            .unwrap();
        let dropped = mode.transform(DeviceReport::at(Vec2::new(1.0, 0.0)));
        let resumed = mode.transform(DeviceReport::at(Vec2::new(2.0, 0.0)));

        // Assert
        assert!(dropped.is_none());
        let delta = resumed.and_then(|r| r.position).unwrap();
        assert!(delta.abs_diff_eq(Vec2::new(0.0, -1.0), 1e-5), "got {delta:?}");
    }

    #[test]
    fn test_stale_gap_reports_zero_motion() {
        // Arrange
        let (mut mode, clock) = make_mode();
        mode.handle(DeviceReport::at(Vec2::ZERO));

        // Act
        clock.set_elapsed(Duration::from_millis(100));
        mode.handle(DeviceReport::at(Vec2::new(80.0, 80.0)));

        // Assert
        assert_eq!(positions(&mode), vec![Vec2::ZERO, Vec2::ZERO]);
    }

    #[test]
    fn test_reset_time_change_does_not_suppress() {
        let (mut mode, _) = make_mode();
        mode.handle(DeviceReport::at(Vec2::ZERO));
        mode.set_reset_time(Duration::from_millis(250));
        assert!(mode.transform(DeviceReport::at(Vec2::ONE)).is_some());
    }

    #[test]
    fn test_out_of_range_report_passes_through_and_resets_sink() {
        // Arrange
        let (mut mode, _) = make_mode();

        // Act
        mode.handle(DeviceReport::out_of_range());

        // Assert
        assert_eq!(mode.pointer().calls(), vec![PointerCall::Reset, PointerCall::Flush]);
    }

    #[test]
    fn test_pressure_is_normalized_with_device_max() {
        let (mut mode, _) = make_mode();
        mode.handle(DeviceReport::at(Vec2::ZERO).with_pressure(25));
        assert!(mode.pointer().calls().contains(&PointerCall::Pressure(0.25)));
    }

    #[test]
    fn test_invalid_config_is_rejected_and_previous_kept() {
        // Arrange
        let (mut mode, _) = make_mode();

        // Act
        let result = mode.set_rotation(f32::NAN);

        // Assert
        assert!(matches!(result, Err(ConfigError::NonFiniteRotation(r)) if r.is_nan()));
        assert_eq!(mode.config().rotation, 0.0);
    }

    #[test]
    fn test_recalibrate_recomputes_matrix_and_suppresses() {
        // Arrange
        let (mut mode, _) = make_mode();
        mode.handle(DeviceReport::at(Vec2::ZERO));
        let coarse = Arc::new(InputDevice::new(
            "unit-tablet",
            TabletSpecifications {
                digitizer: Some(DigitizerSpecifications {
                    width: 200.0,
                    height: 200.0,
                    max_x: 100.0,
                    max_y: 100.0,
                }),
                pen: None,
            },
        ));

        // Act
        mode.recalibrate(coarse);
        let dropped = mode.transform(DeviceReport::at(Vec2::new(1.0, 1.0)));
        let resumed = mode.transform(DeviceReport::at(Vec2::new(2.0, 1.0)));

        // Assert: two millimetres per unit now.
        assert!(dropped.is_none());
        assert_eq!(resumed.and_then(|r| r.position), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_into_pointer_releases_sink() {
        let (mut mode, _) = make_mode();
        mode.handle(DeviceReport::at(Vec2::ZERO));
        let sink = mode.into_pointer();
        assert_eq!(sink.calls().len(), 2);
    }
}
