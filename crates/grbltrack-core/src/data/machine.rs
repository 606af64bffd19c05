//! Machine description consumed from configuration
//!
//! The tracker does not own configuration; hosts load it (see the settings
//! crate) and hand these plain values to the operations that need them.

use serde::{Deserialize, Serialize};

/// Rectangular travel envelope in machine coordinates
///
/// Each axis spans `home ..= home + range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEnvelope {
    /// X home position
    pub home_x: f64,
    /// X travel range
    pub range_x: f64,
    /// Y home position
    pub home_y: f64,
    /// Y travel range
    pub range_y: f64,
    /// Z home position
    pub home_z: f64,
    /// Z travel range
    pub range_z: f64,
}

impl Default for TravelEnvelope {
    fn default() -> Self {
        Self {
            home_x: 0.0,
            range_x: 200.0,
            home_y: 0.0,
            range_y: 200.0,
            home_z: 0.0,
            range_z: 100.0,
        }
    }
}

impl TravelEnvelope {
    /// Lowest reachable X
    pub fn min_x(&self) -> f64 {
        self.home_x
    }

    /// Highest reachable X
    pub fn max_x(&self) -> f64 {
        self.home_x + self.range_x
    }

    /// Lowest reachable Y
    pub fn min_y(&self) -> f64 {
        self.home_y
    }

    /// Highest reachable Y
    pub fn max_y(&self) -> f64 {
        self.home_y + self.range_y
    }

    /// Check a machine-frame XY position against the envelope (bounds inclusive)
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        !(x < self.min_x() || x > self.max_x() || y < self.min_y() || y > self.max_y())
    }
}

/// Presentation options for status text and positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Show translated status labels instead of raw state names
    pub translate_status: bool,
    /// A 4th rotary axis is fitted even if the controller has not reported it yet
    pub fourth_axis_enabled: bool,
    /// Label printed for the 4th axis
    pub fourth_axis_name: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            translate_status: true,
            fourth_axis_enabled: false,
            fourth_axis_name: "A".to_string(),
        }
    }
}
