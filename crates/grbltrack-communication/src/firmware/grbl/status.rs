//! Controller state names from the first field of a status report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine state reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrblStatus {
    Idle,
    Run,
    Hold,
    Jog,
    Alarm,
    Door,
    Check,
    Home,
    Sleep,
    Probe,
    #[default]
    Unknown,
}

struct StatusEntry {
    prefix: &'static str,
    status: GrblStatus,
    text: &'static str,
}

/// Prefix table, matched in order
const STATUS_TABLE: [StatusEntry; 10] = [
    StatusEntry { prefix: "Idle", status: GrblStatus::Idle, text: "Idle" },
    StatusEntry { prefix: "Run", status: GrblStatus::Run, text: "Running" },
    StatusEntry { prefix: "Hold", status: GrblStatus::Hold, text: "Hold" },
    StatusEntry { prefix: "Jog", status: GrblStatus::Jog, text: "Jogging" },
    StatusEntry { prefix: "Alarm", status: GrblStatus::Alarm, text: "Alarm" },
    StatusEntry { prefix: "Door", status: GrblStatus::Door, text: "Door open" },
    StatusEntry { prefix: "Check", status: GrblStatus::Check, text: "Check mode" },
    StatusEntry { prefix: "Home", status: GrblStatus::Home, text: "Homing" },
    StatusEntry { prefix: "Sleep", status: GrblStatus::Sleep, text: "Sleep" },
    StatusEntry { prefix: "Probe", status: GrblStatus::Probe, text: "Probing" },
];

/// Decode a state field such as `Idle` or `Hold:0`.
///
/// Matching is a case-sensitive prefix match; the first table entry wins.
pub fn decode_status(text: &str) -> GrblStatus {
    STATUS_TABLE
        .iter()
        .find(|entry| text.starts_with(entry.prefix))
        .map(|entry| entry.status)
        .unwrap_or(GrblStatus::Unknown)
}

/// Display text for a status.
///
/// With `translate` set the readable label is returned, otherwise the
/// lower-case state name.
pub fn status_text(status: GrblStatus, translate: bool) -> String {
    match STATUS_TABLE.iter().find(|entry| entry.status == status) {
        Some(entry) if translate => entry.text.to_string(),
        Some(entry) => entry.prefix.to_lowercase(),
        None => "Unknown".to_string(),
    }
}

impl GrblStatus {
    /// States in which the machine is moving or about to move
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Run | Self::Jog | Self::Home | Self::Probe)
    }

    pub fn is_alarm(&self) -> bool {
        matches!(self, Self::Alarm)
    }
}

impl fmt::Display for GrblStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", status_text(*self, true))
    }
}
