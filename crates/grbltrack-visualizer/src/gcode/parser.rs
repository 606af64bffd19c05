//! Modal state tracking for G-code lines and parser-state reports.
//!
//! The controller echoes the active modal words in `[GC:...]` reports, and
//! the host sends plain G-code lines. Both go through [`ModalParser::update`],
//! which scans the line word by word and folds every recognised word into a
//! [`ModalState`].

use grbltrack_core::{parse_value, ParseError, Units};
use serde::{Deserialize, Serialize};

use crate::visualizer::ArcDirection;

/// Active modal groups and word values of the controller's G-code parser
///
/// Codes are stored as their G/M numbers (`motion = 2` is G2,
/// `coolant = 9` is M9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalState {
    /// Motion mode (G0=rapid, G1=linear, G2=arc_cw, G3=arc_ccw)
    pub motion: u8,
    /// Plane selection (G17=XY, G18=XZ, G19=YZ)
    pub plane: u8,
    /// Units (G20=inches, G21=millimeters)
    pub units: u8,
    /// Distance mode (G90=absolute, G91=incremental)
    pub distance: u8,
    /// Feed rate mode (G93=inverse_time, G94=units_per_minute)
    pub feed_rate_mode: u8,
    /// Work coordinate system (G54-G59)
    pub coordinate_system: u8,
    /// Program flow (M0, M1, M2, M30)
    pub program_flow: u8,
    /// Coolant (M7=mist, M8=flood, M9=off)
    pub coolant: u8,
    /// Spindle (M3=cw, M4=ccw, M5=off)
    pub spindle: u8,
    /// Set once an M6 was seen
    pub toolchange: bool,
    pub tool: u32,
    pub feed_rate: f64,
    pub spindle_speed: f64,
    /// G43.x active
    pub tool_length_offset_active: bool,
    /// Z word that accompanied the last G43.x
    pub tool_length: f64,
    /// Whether the last [`ModalParser::update`] changed anything
    #[serde(skip)]
    pub changed: bool,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            motion: 0,             // G0
            plane: 17,             // G17
            units: 21,             // G21
            distance: 90,          // G90
            feed_rate_mode: 94,    // G94
            coordinate_system: 54, // G54
            program_flow: 0,       // M0
            coolant: 9,            // M9
            spindle: 5,            // M5
            toolchange: false,
            tool: 0,
            feed_rate: 0.0,
            spindle_speed: 0.0,
            tool_length_offset_active: false,
            tool_length: 0.0,
            changed: false,
        }
    }
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore power-on defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn units(&self) -> Units {
        match self.units {
            20 => Units::INCH,
            21 => Units::MM,
            _ => Units::Unknown,
        }
    }

    /// Direction of the active arc mode, if G2 or G3 is active
    pub fn arc_direction(&self) -> Option<ArcDirection> {
        ArcDirection::from_motion(self.motion)
    }

    pub fn is_absolute(&self) -> bool {
        self.distance == 90
    }

    /// Get a human-readable description of the current motion mode
    pub fn motion_description(&self) -> &'static str {
        match self.motion {
            0 => "Rapid positioning (G0)",
            1 => "Linear interpolation (G1)",
            2 => "Clockwise arc (G2)",
            3 => "Counter-clockwise arc (G3)",
            _ => "Unknown motion mode",
        }
    }

    /// Get a human-readable description of the current plane
    pub fn plane_description(&self) -> &'static str {
        match self.plane {
            17 => "XY plane (G17)",
            18 => "XZ plane (G18)",
            19 => "YZ plane (G19)",
            _ => "Unknown plane",
        }
    }

    /// Get a human-readable description of distance mode
    pub fn distance_description(&self) -> &'static str {
        match self.distance {
            90 => "Absolute positioning (G90)",
            91 => "Incremental positioning (G91)",
            _ => "Unknown distance mode",
        }
    }

    /// Get a human-readable description of units
    pub fn units_description(&self) -> &'static str {
        match self.units {
            20 => "Inches (G20)",
            21 => "Millimeters (G21)",
            _ => "Unknown units",
        }
    }

    pub fn feed_rate_mode_description(&self) -> &'static str {
        match self.feed_rate_mode {
            93 => "Inverse time (G93)",
            94 => "Units per minute (G94)",
            _ => "Unknown feed rate mode",
        }
    }

    pub fn spindle_description(&self) -> &'static str {
        match self.spindle {
            3 => "Spindle clockwise (M3)",
            4 => "Spindle counter-clockwise (M4)",
            5 => "Spindle stopped (M5)",
            _ => "Unknown spindle state",
        }
    }

    pub fn coolant_description(&self) -> &'static str {
        match self.coolant {
            7 => "Mist coolant (M7)",
            8 => "Flood coolant (M8)",
            9 => "Coolant off (M9)",
            _ => "Unknown coolant state",
        }
    }

    /// Render the state as a `[GC:...]` parser-state report.
    ///
    /// Feeding the result back through [`ModalParser::update`] reproduces the
    /// modal groups, tool, feed and spindle speed.
    pub fn gcode_summary(&self) -> String {
        let mut words = vec![
            format!("G{}", self.motion),
            format!("G{}", self.coordinate_system),
            format!("G{}", self.plane),
            format!("G{}", self.units),
            format!("G{}", self.distance),
            format!("G{}", self.feed_rate_mode),
        ];
        if self.tool_length_offset_active {
            words.push("G43.1".to_string());
        }
        if self.program_flow != 0 {
            words.push(format!("M{}", self.program_flow));
        }
        words.push(format!("M{}", self.spindle));
        words.push(format!("M{}", self.coolant));
        words.push(format!("T{}", self.tool));
        words.push(format!("F{}", self.feed_rate));
        words.push(format!("S{}", self.spindle_speed));
        format!("[GC:{}]", words.join(" "))
    }
}

/// Parse the numeric argument of a word
pub fn parse_word_value(letter: char, raw: &str) -> Result<f64, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::MissingValue { letter });
    }
    parse_value(raw)
}

/// Line scanner that folds G-code words into a [`ModalState`]
///
/// Lines are handled one at a time and in arrival order. A Z word is only
/// taken as tool length when a G43.x appeared earlier on the same line.
#[derive(Debug, Default)]
pub struct ModalParser {
    pending_tool_length: bool,
}

impl ModalParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one line and apply every recognised word to `state`.
    ///
    /// Lines starting with `$` or `(` are skipped. Words with missing or
    /// malformed numbers are skipped. `state.changed` reports whether any
    /// field was written.
    pub fn update(&mut self, line: &str, state: &mut ModalState) {
        self.pending_tool_length = false;
        state.changed = false;

        let line = line.trim_start();
        if line.starts_with('$') || line.starts_with('(') {
            return;
        }

        let mut letter: Option<char> = None;
        let mut number = String::new();
        let mut in_comment = false;

        for c in line.chars() {
            if c == ';' {
                break;
            }
            if c == '(' {
                in_comment = true;
            }
            if !in_comment {
                if c.is_ascii_alphabetic() {
                    if let Some(previous) = letter {
                        self.dispatch_word(previous, &number, state);
                    }
                    letter = Some(c.to_ascii_uppercase());
                    number.clear();
                } else if c.is_ascii_digit() || c == '.' || c == '-' {
                    number.push(c);
                }
            }
            if c == ')' {
                in_comment = false;
            }
        }

        if let Some(previous) = letter {
            self.dispatch_word(previous, &number, state);
        }
    }

    fn dispatch_word(&mut self, letter: char, raw: &str, state: &mut ModalState) {
        match parse_word_value(letter, raw) {
            Ok(value) => {
                if self.apply_word(letter, value, state) {
                    state.changed = true;
                }
            }
            Err(e) => {
                tracing::trace!("Skipping word {}{}: {}", letter, raw, e);
            }
        }
    }

    /// Apply a single word, returning whether a field was written
    fn apply_word(&mut self, letter: char, value: f64, state: &mut ModalState) -> bool {
        match letter {
            'G' => {
                if (0.0..=3.0).contains(&value) {
                    state.motion = value as u8;
                } else if (17.0..=19.0).contains(&value) {
                    state.plane = value as u8;
                } else if value == 20.0 || value == 21.0 {
                    state.units = value as u8;
                } else if (43.0..44.0).contains(&value) {
                    state.tool_length_offset_active = true;
                    self.pending_tool_length = true;
                } else if value == 49.0 {
                    state.tool_length_offset_active = false;
                } else if (54.0..=59.0).contains(&value) {
                    state.coordinate_system = value as u8;
                } else if value == 90.0 || value == 91.0 {
                    state.distance = value as u8;
                } else if value == 93.0 || value == 94.0 {
                    state.feed_rate_mode = value as u8;
                } else {
                    tracing::trace!("Ignoring G{}", value);
                    return false;
                }
                true
            }
            'M' => {
                if (0.0..=2.0).contains(&value) || value == 30.0 {
                    state.program_flow = value as u8;
                } else if (3.0..=5.0).contains(&value) {
                    state.spindle = value as u8;
                } else if (7.0..=9.0).contains(&value) {
                    state.coolant = value as u8;
                } else if value == 6.0 {
                    state.toolchange = true;
                } else {
                    tracing::trace!("Ignoring M{}", value);
                    return false;
                }
                true
            }
            'F' => {
                state.feed_rate = value;
                true
            }
            'S' => {
                state.spindle_speed = value;
                true
            }
            'T' => {
                state.tool = value as u32;
                true
            }
            'Z' if self.pending_tool_length => {
                state.tool_length = value;
                true
            }
            _ => false,
        }
    }
}
