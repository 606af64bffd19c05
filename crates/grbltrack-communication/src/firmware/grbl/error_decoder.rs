//! GRBL Error, Alarm and Setting Message Catalogs
//!
//! Converts error, alarm and setting codes to human-readable messages. The
//! catalogs come preloaded with the GRBL 1.1 texts and can be replaced or
//! extended from the CSV files GRBL publishes
//! (`"code",...,"message"` per line).

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Hint appended to arc related errors 32 to 34
pub const ARC_PRECISION_HINT: &str =
    "\n\nPossible reason: scale down of GCode with G2/3 commands.\nSolution: use more decimal places.";

/// Error codes not caused by the G-code program itself
const ENVIRONMENT_ERRORS: [i32; 15] = [3, 5, 6, 7, 8, 9, 10, 12, 13, 14, 15, 16, 17, 18, 19];

const GRBL_ERRORS: &[(&str, &str)] = &[
    ("1", "G-code words consist of a letter and a value. Letter was not found."),
    ("2", "Numeric value format is not valid or missing an expected value."),
    ("3", "Grbl '$' system command was not recognized or supported."),
    ("4", "Negative value received for an expected positive value."),
    ("5", "Homing cycle is not enabled via settings."),
    ("6", "Minimum step pulse time must be greater than 3usec."),
    ("7", "EEPROM read failed. Reset and restored to default values."),
    ("8", "Grbl '$' command cannot be used unless Grbl is IDLE. Ensures smooth operation during a job."),
    ("9", "G-code locked out during alarm or jog state."),
    ("10", "Soft limits cannot be enabled without homing also enabled."),
    ("11", "Max characters per line exceeded. Line was not processed and executed."),
    ("12", "Grbl '$' setting value exceeds the maximum step rate supported."),
    ("13", "Safety door detected as opened and door state initiated."),
    ("14", "Build info or startup line exceeded EEPROM line length limit."),
    ("15", "Jog target exceeds machine travel. Command ignored."),
    ("16", "Jog command with no '=' or contains prohibited g-code."),
    ("17", "Laser mode requires PWM output."),
    ("20", "Unsupported or invalid g-code command found in block."),
    ("21", "More than one g-code command from same modal group found in block."),
    ("22", "Feed rate has not yet been set or is undefined."),
    ("23", "G-code command in block requires an integer value."),
    ("24", "Two G-code commands that both require the use of the XYZ axis words were detected in the block."),
    ("25", "A G-code word was repeated in the block."),
    ("26", "A G-code command implicitly or explicitly requires XYZ axis words in the block, but none were detected."),
    ("27", "N line number value is not within the valid range of 1 - 9,999,999."),
    ("28", "A G-code command was sent, but is missing some required P or L value words in the line."),
    ("29", "Grbl supports six work coordinate systems G54-G59. G59.1, G59.2, and G59.3 are not supported."),
    ("30", "The G53 G-code command requires either a G0 seek or G1 feed motion mode to be active."),
    ("31", "There are unused axis words in the block and G80 motion mode cancel is active."),
    ("32", "A G2 or G3 arc was commanded but there are no XYZ axis words in the selected plane to trace the arc."),
    ("33", "The motion command has an invalid target. G2, G3, and G38.2 generates this error if the arc is impossible to generate or if the probe target is the current position."),
    ("34", "A G2 or G3 arc, traced with the radius definition, had a mathematical error when computing the arc geometry."),
    ("35", "A G2 or G3 arc, traced with the offset definition, is missing the IJK offset word in the selected plane to trace the arc."),
    ("36", "There are unused, leftover G-code words that aren't used by any command in the block."),
    ("37", "The G43.1 dynamic tool length offset command cannot apply an offset to an axis other than its configured axis."),
    ("38", "Tool number greater than max supported value."),
];

const GRBL_ALARMS: &[(&str, &str)] = &[
    ("1", "Hard limit triggered. Machine position is likely lost due to sudden and immediate halt. Re-homing is highly recommended."),
    ("2", "Soft limit: G-code motion target exceeds machine travel. Machine position safely retained. Alarm may be unlocked."),
    ("3", "Reset while in motion. Grbl cannot guarantee position. Lost steps are likely. Re-homing is highly recommended."),
    ("4", "Probe fail. The probe is not in the expected initial state before starting probe cycle, where G38.2 and G38.3 is not triggered and G38.4 and G38.5 is triggered."),
    ("5", "Probe fail. Probe did not contact the workpiece within the programmed travel for G38.2 and G38.4."),
    ("6", "Homing fail. Reset during active homing cycle."),
    ("7", "Homing fail. Safety door was opened during active homing cycle."),
    ("8", "Homing fail. Cycle failed to clear limit switch when pulling off. Try increasing pull-off setting or check wiring."),
    ("9", "Homing fail. Could not find limit switch within search distance. Defined as 1.5 * max_travel on search and 5 * pulloff on locate phases."),
];

const GRBL_SETTINGS: &[(&str, &str)] = &[
    ("0", "Step pulse time, microseconds. Sets time length per step. Minimum 3usec."),
    ("1", "Step idle delay, milliseconds. Sets a short hold delay when stopping to let dynamics settle before disabling steppers. Value 255 keeps motors enabled with no delay."),
    ("2", "Step pulse invert, mask. Inverts the step signal. Set axis bit to invert (00000ZYX)."),
    ("3", "Step direction invert, mask. Inverts the direction signal. Set axis bit to invert (00000ZYX)."),
    ("4", "Invert step enable pin, boolean. Inverts the stepper driver enable pin signal."),
    ("5", "Invert limit pins, boolean. Inverts the all of the limit input pins."),
    ("6", "Invert probe pin, boolean. Inverts the probe input pin signal."),
    ("10", "Status report options, mask. Alters data included in status reports."),
    ("11", "Junction deviation, millimeters. Sets how fast Grbl travels through consecutive motions. Lower value slows it down."),
    ("12", "Arc tolerance, millimeters. Sets the G2 and G3 arc tracing accuracy based on radial error. Beware: A very small value may effect performance."),
    ("13", "Report in inches, boolean. Enables inch units when returning any position and rate value that is not a settings value."),
    ("20", "Soft limits enable, boolean. Enables soft limits checks within machine travel and sets alarm when exceeded. Requires homing."),
    ("21", "Hard limits enable, boolean. Enables hard limits. Immediately halts motion and throws an alarm when switch is triggered."),
    ("22", "Homing cycle enable, boolean. Enables homing cycle. Requires limit switches on all axes."),
    ("23", "Homing direction invert, mask. Homing searches for a switch in the positive direction. Set axis bit (00000ZYX) to search in negative direction."),
    ("24", "Homing locate feed rate, mm/min. Feed rate to slowly engage limit switch to determine its location accurately."),
    ("25", "Homing search seek rate, mm/min. Seek rate to quickly find the limit switch before the slower locating phase."),
    ("26", "Homing switch debounce delay, milliseconds. Sets a short delay between phases of homing cycle to let a switch debounce."),
    ("27", "Homing switch pull-off distance, millimeters. Retract distance after triggering switch to disengage it. Homing will fail if switch isn't cleared."),
    ("30", "Maximum spindle speed, RPM. Maximum spindle speed. Sets PWM to 100% duty cycle."),
    ("31", "Minimum spindle speed, RPM. Minimum spindle speed. Sets PWM to 0.4% or lowest duty cycle."),
    ("32", "Laser-mode enable, boolean. Enables laser mode. Consecutive G1/2/3 commands will not halt when spindle speed is changed."),
    ("100", "X-axis travel resolution, step/mm. X-axis travel resolution in steps per millimeter."),
    ("101", "Y-axis travel resolution, step/mm. Y-axis travel resolution in steps per millimeter."),
    ("102", "Z-axis travel resolution, step/mm. Z-axis travel resolution in steps per millimeter."),
    ("110", "X-axis maximum rate, mm/min. X-axis maximum rate. Used as G0 rapid rate."),
    ("111", "Y-axis maximum rate, mm/min. Y-axis maximum rate. Used as G0 rapid rate."),
    ("112", "Z-axis maximum rate, mm/min. Z-axis maximum rate. Used as G0 rapid rate."),
    ("120", "X-axis acceleration, mm/sec^2. X-axis acceleration. Used for motion planning to not exceed motor torque and lose steps."),
    ("121", "Y-axis acceleration, mm/sec^2. Y-axis acceleration. Used for motion planning to not exceed motor torque and lose steps."),
    ("122", "Z-axis acceleration, mm/sec^2. Z-axis acceleration. Used for motion planning to not exceed motor torque and lose steps."),
    ("130", "X-axis maximum travel, millimeters. Maximum X-axis travel distance from homing switch. Determines valid machine space for soft-limits and homing search distances."),
    ("131", "Y-axis maximum travel, millimeters. Maximum Y-axis travel distance from homing switch. Determines valid machine space for soft-limits and homing search distances."),
    ("132", "Z-axis maximum travel, millimeters. Maximum Z-axis travel distance from homing switch. Determines valid machine space for soft-limits and homing search distances."),
];

/// Errors raised while loading a message catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Code to message lookup table
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    entries: HashMap<String, String>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(code, message)| (code.to_string(), message.to_string()))
                .collect(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(code.into(), message.into());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(code.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge CSV rows into the table, returning the number of rows taken.
    ///
    /// The first column is the code and the last column the message. Rows
    /// whose code does not start with a digit (headers) or that have fewer
    /// than two columns are skipped. Existing codes are overwritten.
    pub fn load_csv(&mut self, text: &str) -> Result<usize, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut loaded = 0;
        for record in reader.records() {
            let record = record?;
            if record.len() < 2 {
                continue;
            }
            let (Some(code), Some(message)) = (record.get(0), record.get(record.len() - 1)) else {
                continue;
            };
            if !code.starts_with(|c: char| c.is_ascii_digit()) {
                tracing::trace!("Skipping catalog row '{}'", code);
                continue;
            }
            self.insert(code, message);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn load_csv_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, CatalogError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let loaded = self.load_csv(&text)?;
        tracing::debug!(
            "Loaded {} catalog entries from {}",
            loaded,
            path.as_ref().display()
        );
        Ok(loaded)
    }
}

/// Code of an `error:n` / `ALARM:n` line, or the text itself when bare
fn message_code(text: &str) -> &str {
    text.split_once(':').map_or(text, |(_, code)| code).trim()
}

/// Error, alarm and setting catalogs of a session
#[derive(Debug, Clone)]
pub struct MessageCatalogs {
    pub errors: MessageTable,
    pub alarms: MessageTable,
    pub settings: MessageTable,
}

impl Default for MessageCatalogs {
    fn default() -> Self {
        Self::grbl()
    }
}

impl MessageCatalogs {
    /// Catalogs preloaded with the GRBL 1.1 texts
    pub fn grbl() -> Self {
        Self {
            errors: MessageTable::from_entries(GRBL_ERRORS),
            alarms: MessageTable::from_entries(GRBL_ALARMS),
            settings: MessageTable::from_entries(GRBL_SETTINGS),
        }
    }

    pub fn empty() -> Self {
        Self {
            errors: MessageTable::new(),
            alarms: MessageTable::new(),
            settings: MessageTable::new(),
        }
    }

    /// Message for an error code or an `error:n` line
    pub fn error_message(&self, code_or_line: &str) -> String {
        let code = message_code(code_or_line);
        match self.errors.get(code) {
            Some(message) => {
                let mut message = message.to_string();
                if matches!(code.parse::<i32>(), Ok(32..=34)) {
                    message.push_str(ARC_PRECISION_HINT);
                }
                message
            }
            None => format!("no information found for error-nr. '{}'", code),
        }
    }

    /// Message for an alarm code or an `ALARM:n` line
    pub fn alarm_message(&self, code_or_line: &str) -> String {
        let code = message_code(code_or_line);
        match self.alarms.get(code) {
            Some(message) => message.to_string(),
            None => format!("no information found for alarm-nr. '{}'", code),
        }
    }

    /// Description of a `$n` setting
    pub fn setting_message(&self, code: &str) -> String {
        let code = code.trim().trim_start_matches('$');
        match self.settings.get(code) {
            Some(message) => message.to_string(),
            None => format!("no information found '{}'", code),
        }
    }
}

/// Whether an error code points at the G-code program rather than the
/// machine or its configuration. Unknown codes count as program errors.
pub fn is_error_caused_by_program(code: i32) -> bool {
    !ENVIRONMENT_ERRORS.contains(&code)
}

/// [`is_error_caused_by_program`] for an `error:n` line; unparseable codes
/// count as program errors
pub fn is_error_line_caused_by_program(line: &str) -> bool {
    message_code(line)
        .parse::<i32>()
        .map_or(true, is_error_caused_by_program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        let catalogs = MessageCatalogs::grbl();
        assert_eq!(
            catalogs.error_message("1"),
            "G-code words consist of a letter and a value. Letter was not found."
        );
        assert_eq!(
            catalogs.error_message("error:9"),
            "G-code locked out during alarm or jog state."
        );
        assert_eq!(
            catalogs.error_message("error:99"),
            "no information found for error-nr. '99'"
        );
    }

    #[test]
    fn test_arc_errors_get_hint() {
        let catalogs = MessageCatalogs::grbl();
        for code in ["32", "33", "error:34"] {
            assert!(catalogs.error_message(code).ends_with(ARC_PRECISION_HINT));
        }
        assert!(!catalogs.error_message("35").contains("Possible reason"));
    }

    #[test]
    fn test_alarm_and_setting_messages() {
        let catalogs = MessageCatalogs::grbl();
        assert!(catalogs.alarm_message("ALARM:1").contains("Hard limit"));
        assert_eq!(
            catalogs.alarm_message("ALARM:42"),
            "no information found for alarm-nr. '42'"
        );
        assert!(catalogs.setting_message("130").contains("X-axis maximum travel"));
        assert!(catalogs.setting_message("$22").contains("Homing cycle enable"));
        assert_eq!(catalogs.setting_message("999"), "no information found '999'");
    }

    #[test]
    fn test_load_csv() {
        let csv = "\"Error Code in v1.1+\",\"Error Message\",\"Error Description\"\n\
                   \"1\",\"Expected command letter\",\"Letter was not found, try again.\"\n\
                   \"40\",\"Custom\",\"Vendor specific\"\n";
        let mut table = MessageTable::new();
        assert_eq!(table.load_csv(csv).unwrap(), 2);
        assert_eq!(table.get("1"), Some("Letter was not found, try again."));
        assert_eq!(table.get("40"), Some("Vendor specific"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_error_classification() {
        for code in [3, 5, 10, 12, 19] {
            assert!(!is_error_caused_by_program(code));
        }
        for code in [1, 2, 4, 11, 20, 33, 200] {
            assert!(is_error_caused_by_program(code));
        }
        assert!(!is_error_line_caused_by_program("error:9"));
        assert!(is_error_line_caused_by_program("error:22"));
        assert!(is_error_line_caused_by_program("error:x"));
        assert!(is_error_line_caused_by_program("error"));
    }

    #[test]
    fn test_empty_catalogs() {
        let catalogs = MessageCatalogs::empty();
        assert!(catalogs.errors.is_empty());
        assert_eq!(
            catalogs.error_message("1"),
            "no information found for error-nr. '1'"
        );
    }
}
