//! Configuration for GrblTrack
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform-specific config directory.
//!
//! Configuration is organized into two sections:
//! - Machine travel envelope (home position and travel range per axis)
//! - Display preferences (status translation, 4th axis label)

use grbltrack_core::{DisplayOptions, TravelEnvelope};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "grbltrack";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Machine travel envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// X home position (mm)
    pub home_x: f64,
    /// X travel range (mm)
    pub range_x: f64,
    /// Y home position (mm)
    pub home_y: f64,
    /// Y travel range (mm)
    pub range_y: f64,
    /// Z home position (mm)
    pub home_z: f64,
    /// Z travel range (mm)
    pub range_z: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self::from(TravelEnvelope::default())
    }
}

impl MachineSettings {
    /// Travel envelope consumed by the limit checks
    pub fn envelope(&self) -> TravelEnvelope {
        TravelEnvelope {
            home_x: self.home_x,
            range_x: self.range_x,
            home_y: self.home_y,
            range_y: self.range_y,
            home_z: self.home_z,
            range_z: self.range_z,
        }
    }
}

impl From<TravelEnvelope> for MachineSettings {
    fn from(env: TravelEnvelope) -> Self {
        Self {
            home_x: env.home_x,
            range_x: env.range_x,
            home_y: env.home_y,
            range_y: env.range_y,
            home_z: env.home_z,
            range_z: env.range_z,
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Show translated status labels
    pub translate_status: bool,
    /// A 4th rotary axis is fitted
    pub fourth_axis_enabled: bool,
    /// Label for the 4th axis
    pub fourth_axis_name: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        let options = DisplayOptions::default();
        Self {
            translate_status: options.translate_status,
            fourth_axis_enabled: options.fourth_axis_enabled,
            fourth_axis_name: options.fourth_axis_name,
        }
    }
}

impl DisplaySettings {
    /// Display options handed to the session
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            translate_status: self.translate_status,
            fourth_axis_enabled: self.fourth_axis_enabled,
            fourth_axis_name: self.fourth_axis_name.trim().to_string(),
        }
    }
}

/// File format selected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Machine travel envelope
    pub machine: MachineSettings,
    /// Display preferences
    pub display: DisplaySettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config directory for GrblTrack
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at `path`, falling back to defaults when the file is
    /// missing or rejected.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Rejected config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.machine;
        for (key, value) in [
            ("machine.range_x", m.range_x),
            ("machine.range_y", m.range_y),
            ("machine.range_z", m.range_z),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        for (key, value) in [
            ("machine.home_x", m.home_x),
            ("machine.home_y", m.home_y),
            ("machine.home_z", m.home_z),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if self.display.fourth_axis_enabled && self.display.fourth_axis_name.trim().is_empty() {
            return Err(ConfigError::MissingValue(
                "display.fourth_axis_name".to_string(),
            ));
        }

        Ok(())
    }

    /// Travel envelope from the machine section
    pub fn envelope(&self) -> TravelEnvelope {
        self.machine.envelope()
    }

    /// Display options from the display section
    pub fn display_options(&self) -> DisplayOptions {
        self.display.options()
    }
}
