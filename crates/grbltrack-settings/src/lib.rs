//! GrblTrack Settings Crate
//!
//! Loads, validates and saves the machine travel envelope and display
//! options consumed by the tracker.

pub mod config;
pub mod error;

pub use config::{Config, DisplaySettings, MachineSettings, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
