//! TOML settings for the daemon.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration:
//!
//! ```toml
//! [relative]
//! sensitivity_x = 12.0
//! sensitivity_y = 12.0
//! rotation = 0.0
//! reset_time_ms = 100
//!
//! [device]
//! name = "Wacom CTL-472"
//!
//! [device.digitizer]
//! width = 152.0
//! height = 95.0
//! max_x = 15200.0
//! max_y = 9500.0
//!
//! [device.pen]
//! max_pressure = 2047
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tablet_core::{
    DigitizerSpecifications, InputDevice, PenSpecifications, RelativeModeSettings,
    TabletSpecifications,
};
use thiserror::Error;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level daemon settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DaemonSettings {
    #[serde(default)]
    pub relative: RelativeModeSettings,
    #[serde(default)]
    pub device: DeviceSettings,
}

/// Descriptor of the tablet whose reports are replayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceSettings {
    #[serde(default = "default_device_name")]
    pub name: String,
    /// Absent calibration selects the fallback scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitizer: Option<DigitizerSpecifications>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen: Option<PenSpecifications>,
}

fn default_device_name() -> String {
    "virtual tablet".to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            name: default_device_name(),
            digitizer: None,
            pen: None,
        }
    }
}

impl DeviceSettings {
    /// Builds the device descriptor the output mode binds to.
    pub fn to_input_device(&self) -> InputDevice {
        InputDevice::new(
            self.name.clone(),
            TabletSpecifications {
                digitizer: self.digitizer,
                pen: self.pen,
            },
        )
    }
}

impl DaemonSettings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read and
    /// [`SettingsError::Parse`] if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tablet_core::RelativeModeConfig;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let settings = DaemonSettings::from_toml_str("").unwrap();
        assert_eq!(settings, DaemonSettings::default());
        assert_eq!(settings.relative.sensitivity_x, 10.0);
        assert_eq!(settings.relative.reset_time_ms, 100);
        assert_eq!(settings.device.name, "virtual tablet");
    }

    #[test]
    fn test_full_toml_is_parsed() {
        // Arrange
        let toml = r#"
            [relative]
            sensitivity_x = 12.5
            sensitivity_y = 8.0
            rotation = 90.0
            reset_time_ms = 250

            [device]
            name = "Test Tablet"

            [device.digitizer]
            width = 152.0
            height = 95.0
            max_x = 15200.0
            max_y = 9500.0

            [device.pen]
            max_pressure = 2047
        "#;

        // Act
        let settings = DaemonSettings::from_toml_str(toml).unwrap();
        let config = RelativeModeConfig::from(settings.relative.clone());

        // Assert
        assert_eq!(config.sensitivity.x, 12.5);
        assert_eq!(config.sensitivity.y, 8.0);
        assert_eq!(config.rotation, 90.0);
        assert_eq!(config.reset_time, Duration::from_millis(250));
        assert_eq!(settings.device.name, "Test Tablet");
        assert_eq!(settings.device.digitizer.map(|d| d.max_x), Some(15200.0));
        assert_eq!(settings.device.pen.map(|p| p.max_pressure), Some(2047));
    }

    #[test]
    fn test_partial_relative_table_keeps_other_defaults() {
        let settings = DaemonSettings::from_toml_str("[relative]\nrotation = 45.0\n").unwrap();
        assert_eq!(settings.relative.rotation, 45.0);
        assert_eq!(settings.relative.sensitivity_y, 10.0);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result = DaemonSettings::from_toml_str("[relative\nrotation = ");
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = DaemonSettings::load(Path::new("/nonexistent/tabletd/settings.toml"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_device_settings_build_descriptor() {
        let settings = DeviceSettings {
            name: "pad".to_string(),
            digitizer: None,
            pen: Some(PenSpecifications { max_pressure: 1023 }),
        };
        let device = settings.to_input_device();
        assert_eq!(device.name, "pad");
        assert!(device.digitizer().is_none());
        assert_eq!(device.pen().map(|p| p.max_pressure), Some(1023));
    }
}
