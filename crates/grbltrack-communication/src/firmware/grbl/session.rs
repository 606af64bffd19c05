//! GRBL session state
//!
//! A [`Session`] owns everything learned from one controller connection:
//! positions, offsets, the coordinate and settings tables, the modal parser
//! state and the extent of all positions seen. Lines are applied one at a
//! time in arrival order through [`Session::process_line`].

use std::collections::BTreeMap;

use grbltrack_core::{
    thread_safe, AxisSet, DisplayOptions, ParseError, ThreadSafe, TravelEnvelope, XyzPoint,
};
use grbltrack_visualizer::{BoundingBox, ModalParser, ModalState};
use serde::{Deserialize, Serialize};

use super::error_decoder::MessageCatalogs;
use super::status::{status_text, GrblStatus};
use super::status_parser::{parse_axis_values, point_from_values, OverrideState, StatusParser};

/// Ids accepted in `[ID:values]` coordinate reports
pub const COORDINATE_IDS: [&str; 11] = [
    "G54", "G55", "G56", "G57", "G58", "G59", "G28", "G30", "G92", "PRB", "TLO",
];

/// Session shared between a transport thread and readers
pub type SharedSession = ThreadSafe<Session>;

/// Classification of one received line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    /// Blank line
    Empty,
    /// `ok` acknowledgment
    Ok,
    /// `error:n`, carrying the code text
    Error(String),
    /// `ALARM:n`, carrying the code text
    Alarm(String),
    /// `<...>` status report
    Status(GrblStatus),
    /// `[GC:...]` parser state report
    ParserState,
    /// `[ID:...]` coordinate report for the given id
    Coordinate(String),
    /// `$n=value` setting
    Setting(u32),
    /// Bracketed feedback or other controller text
    Message(String),
    /// Startup banner, carrying the firmware version
    Banner(String),
    /// G-code line applied to the modal state
    Gcode,
    /// Line that looked like a report but could not be decoded
    Malformed(String),
}

/// Serializable view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: GrblStatus,
    pub status_text: String,
    pub machine_position: XyzPoint,
    pub work_position: XyzPoint,
    pub work_offset: XyzPoint,
    pub feed_rate: f64,
    pub spindle_speed: f64,
    pub overrides: Option<OverrideState>,
    pub coordinates: BTreeMap<String, XyzPoint>,
    pub settings: BTreeMap<u32, f64>,
    pub axes: AxisSet,
    pub firmware_version: Option<String>,
    pub legacy_firmware: bool,
    pub modal: ModalState,
    pub extents: String,
}

/// State of one controller connection
#[derive(Debug)]
pub struct Session {
    status: GrblStatus,
    machine_position: XyzPoint,
    work_position: XyzPoint,
    work_offset: XyzPoint,
    feed_rate: f64,
    spindle_speed: f64,
    overrides: Option<OverrideState>,
    coordinates: BTreeMap<String, XyzPoint>,
    settings: BTreeMap<u32, f64>,
    axes: AxisSet,
    position_changed: bool,
    wco_changed: bool,
    firmware_version: Option<String>,
    legacy_firmware: bool,
    catalogs: MessageCatalogs,
    parser: ModalParser,
    modal: ModalState,
    extents: BoundingBox,
    display: DisplayOptions,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_display(DisplayOptions::default())
    }

    pub fn with_display(display: DisplayOptions) -> Self {
        Self {
            status: GrblStatus::Unknown,
            machine_position: XyzPoint::default(),
            work_position: XyzPoint::default(),
            work_offset: XyzPoint::default(),
            feed_rate: 0.0,
            spindle_speed: 0.0,
            overrides: None,
            coordinates: BTreeMap::new(),
            settings: BTreeMap::new(),
            axes: AxisSet::EMPTY,
            position_changed: false,
            wco_changed: false,
            firmware_version: None,
            legacy_firmware: false,
            catalogs: MessageCatalogs::grbl(),
            parser: ModalParser::new(),
            modal: ModalState::default(),
            extents: BoundingBox::new(),
            display,
        }
    }

    /// Wrap the session for use from several threads
    pub fn into_shared(self) -> SharedSession {
        thread_safe(self)
    }

    /// Forget everything learned from the controller.
    ///
    /// Message catalogs and display options are kept.
    pub fn reset(&mut self) {
        let catalogs = std::mem::replace(&mut self.catalogs, MessageCatalogs::empty());
        let display = std::mem::take(&mut self.display);
        *self = Self::with_display(display);
        self.catalogs = catalogs;
    }

    /// Classify one received line and apply it to the session
    pub fn process_line(&mut self, line: &str) -> LineKind {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Empty;
        }

        let lower = line.to_ascii_lowercase();
        let kind = if lower == "ok" {
            LineKind::Ok
        } else if lower.starts_with("error:") {
            LineKind::Error(line["error:".len()..].trim().to_string())
        } else if lower.starts_with("alarm:") {
            self.status = GrblStatus::Alarm;
            LineKind::Alarm(line["alarm:".len()..].trim().to_string())
        } else if StatusParser::looks_like_report(line) {
            match self.decode_status_report(line) {
                Ok(status) => LineKind::Status(status),
                Err(e) => LineKind::Malformed(e.to_string()),
            }
        } else if line.contains('|') {
            LineKind::Malformed(format!("unrecognised report '{}'", line))
        } else if line.starts_with('[') {
            self.process_bracket_line(line)
        } else if let Some(body) = line.strip_prefix('$') {
            self.process_setting_line(line, body)
        } else if line.starts_with("Grbl ") {
            self.process_banner(line)
        } else {
            self.parser.update(line, &mut self.modal);
            LineKind::Gcode
        };

        tracing::debug!("Line '{}' classified as {:?}", line, kind);
        kind
    }

    fn process_bracket_line(&mut self, line: &str) -> LineKind {
        let body = line
            .trim_start_matches('[')
            .strip_suffix(']')
            .unwrap_or_else(|| line.trim_start_matches('['));

        let Some((id, rest)) = body.split_once(':') else {
            return LineKind::Message(body.to_string());
        };

        if id == "GC" {
            self.parser.update(rest, &mut self.modal);
            return LineKind::ParserState;
        }

        if COORDINATE_IDS.contains(&id) {
            let (values, extra) = rest.split_once(':').unwrap_or((rest, ""));
            return match self.decode_coordinate_report(id, values, extra) {
                Ok(()) => LineKind::Coordinate(id.to_string()),
                Err(e) => LineKind::Malformed(e.to_string()),
            };
        }

        LineKind::Message(body.to_string())
    }

    fn process_setting_line(&mut self, line: &str, body: &str) -> LineKind {
        let Some((id, value)) = body.split_once('=') else {
            return LineKind::Message(line.to_string());
        };
        let Ok(id) = id.trim().parse::<u32>() else {
            // Startup blocks ($N0=...) and other non-numeric ids
            return LineKind::Message(line.to_string());
        };
        match self.decode_setting(id, value) {
            Ok(()) => LineKind::Setting(id),
            Err(e) => LineKind::Malformed(e.to_string()),
        }
    }

    fn process_banner(&mut self, line: &str) -> LineKind {
        let version = line
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();
        self.legacy_firmware = version.starts_with("0.");
        self.firmware_version = Some(version.clone());

        // The banner follows a controller reset
        self.position_changed = true;
        self.wco_changed = true;
        self.modal.reset();

        tracing::debug!(
            "Controller reset, firmware {} (legacy: {})",
            version,
            self.legacy_firmware
        );
        LineKind::Banner(version)
    }

    /// Decode a `<...>` status report and update positions and state.
    ///
    /// Reports that carry only one position space get the other derived from
    /// the latest known work coordinate offset. The work position is absorbed
    /// into the session extents.
    pub fn decode_status_report(&mut self, line: &str) -> Result<GrblStatus, ParseError> {
        let report = StatusParser::parse_full(line)?;

        self.status = report.status;
        for axis in report.axes.iter() {
            self.axes.insert(axis);
        }

        if let Some(wco) = report.wco {
            if !wco.almost_equal(&self.work_offset) {
                self.wco_changed = true;
            }
            self.work_offset = wco;
        }

        let wco = self.work_offset;
        let positions = match (report.mpos, report.wpos) {
            (Some(mpos), Some(wpos)) => Some((mpos, wpos)),
            (Some(mpos), None) => Some((mpos, mpos.subtract(&wco))),
            (None, Some(wpos)) => Some((wpos.add(&wco), wpos)),
            (None, None) => None,
        };
        if let Some((mpos, wpos)) = positions {
            if !mpos.almost_equal(&self.machine_position) || !wpos.almost_equal(&self.work_position)
            {
                self.position_changed = true;
            }
            self.machine_position = mpos;
            self.work_position = wpos;
            self.extents.absorb_position(&wpos);
        }

        if let Some(feed) = report.feed_rate {
            self.feed_rate = feed;
        }
        if let Some(speed) = report.spindle_speed {
            self.spindle_speed = speed;
        }
        if report.overrides.is_some() {
            self.overrides = report.overrides;
        }

        Ok(self.status)
    }

    /// Store a coordinate report such as `[G54:0.000,0.000,0.000]`.
    ///
    /// Only ids in [`COORDINATE_IDS`] are accepted. A single value is stored
    /// as Z only. For `PRB` the A component holds the probe result: 1 when
    /// `extra` is `"1"`, 0 otherwise.
    pub fn decode_coordinate_report(
        &mut self,
        id: &str,
        raw_values: &str,
        extra: &str,
    ) -> Result<(), ParseError> {
        if !COORDINATE_IDS.contains(&id) {
            tracing::warn!("Ignoring coordinate report with unknown id '{}'", id);
            return Err(ParseError::UnknownCoordinateId { id: id.to_string() });
        }

        let values = parse_axis_values(raw_values)?;
        let (mut point, axes) = point_from_values(&values);
        for axis in axes.iter() {
            self.axes.insert(axis);
        }

        if id == "PRB" {
            point.a = if extra == "1" { 1.0 } else { 0.0 };
        }

        tracing::debug!("Coordinate {} = {}", id, point);
        self.coordinates.insert(id.to_string(), point);
        Ok(())
    }

    /// Store a numeric `$n` setting; non-numeric values leave the table unchanged
    pub fn decode_setting(&mut self, id: u32, raw: &str) -> Result<(), ParseError> {
        let value = grbltrack_core::parse_value(raw)?;
        tracing::debug!("Setting ${} = {}", id, value);
        self.settings.insert(id, value);
        Ok(())
    }

    pub fn setting(&self, id: u32) -> Option<f64> {
        self.settings.get(&id).copied()
    }

    pub fn coordinate(&self, id: &str) -> Option<XyzPoint> {
        self.coordinates.get(id).copied()
    }

    /// Whether the last probe report signalled contact
    pub fn probe_succeeded(&self) -> bool {
        self.coordinate("PRB").is_some_and(|p| p.a != 0.0)
    }

    /// Fixed-width text of a stored coordinate, or `no data`
    pub fn display_coordinate(&self, id: &str) -> String {
        let Some(point) = self.coordinate(id) else {
            return "no data".to_string();
        };
        if id == "TLO" {
            return format!("{:18}{:8.3}", "", point.z);
        }

        let mut text = format!("{:8.3} {:8.3} {:8.3}", point.x, point.y, point.z);
        for axis in self.axes.iter() {
            text.push_str(&format!(" {:8.3}", point.axis(axis)));
        }
        text
    }

    /// Format a position using the session's fourth axis setting
    pub fn format_position(&self, position: &XyzPoint, single_lines: bool, full: bool) -> String {
        let fourth_axis = self
            .display
            .fourth_axis_enabled
            .then_some(self.display.fourth_axis_name.as_str());
        position.format(single_lines, full, fourth_axis)
    }

    /// Check whether a toolpath's extents, placed at the current work
    /// position, fit the machine's travel envelope
    pub fn toolpath_within_limits(&self, toolpath: &BoundingBox, envelope: &TravelEnvelope) -> bool {
        toolpath.is_within_limits(&self.machine_position, &self.work_position, envelope)
    }

    pub fn status(&self) -> GrblStatus {
        self.status
    }

    /// Status text, translated when the display options ask for it
    pub fn status_display(&self) -> String {
        status_text(self.status, self.display.translate_status)
    }

    pub fn machine_position(&self) -> XyzPoint {
        self.machine_position
    }

    pub fn work_position(&self) -> XyzPoint {
        self.work_position
    }

    pub fn work_offset(&self) -> XyzPoint {
        self.work_offset
    }

    pub fn feed_rate(&self) -> f64 {
        self.feed_rate
    }

    pub fn spindle_speed(&self) -> f64 {
        self.spindle_speed
    }

    pub fn overrides(&self) -> Option<OverrideState> {
        self.overrides
    }

    /// Optional axes seen in any report this session
    pub fn axes(&self) -> AxisSet {
        self.axes
    }

    pub fn position_changed(&self) -> bool {
        self.position_changed
    }

    pub fn wco_changed(&self) -> bool {
        self.wco_changed
    }

    /// Acknowledge position and offset changes
    pub fn clear_change_flags(&mut self) {
        self.position_changed = false;
        self.wco_changed = false;
    }

    pub fn firmware_version(&self) -> Option<&str> {
        self.firmware_version.as_deref()
    }

    /// True for 0.x firmware, which reports status in the pre-1.1 format
    pub fn is_legacy_firmware(&self) -> bool {
        self.legacy_firmware
    }

    pub fn modal_state(&self) -> &ModalState {
        &self.modal
    }

    /// Extent of all work positions reported so far
    pub fn extents(&self) -> &BoundingBox {
        &self.extents
    }

    pub fn reset_extents(&mut self) {
        self.extents.reset();
    }

    pub fn catalogs(&self) -> &MessageCatalogs {
        &self.catalogs
    }

    pub fn catalogs_mut(&mut self) -> &mut MessageCatalogs {
        &mut self.catalogs
    }

    pub fn display_options(&self) -> &DisplayOptions {
        &self.display
    }

    pub fn set_display_options(&mut self, display: DisplayOptions) {
        self.display = display;
    }

    pub fn error_message(&self, code_or_line: &str) -> String {
        self.catalogs.error_message(code_or_line)
    }

    pub fn alarm_message(&self, code_or_line: &str) -> String {
        self.catalogs.alarm_message(code_or_line)
    }

    pub fn setting_message(&self, code: &str) -> String {
        self.catalogs.setting_message(code)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            status_text: self.status_display(),
            machine_position: self.machine_position,
            work_position: self.work_position,
            work_offset: self.work_offset,
            feed_rate: self.feed_rate,
            spindle_speed: self.spindle_speed,
            overrides: self.overrides,
            coordinates: self.coordinates.clone(),
            settings: self.settings.clone(),
            axes: self.axes,
            firmware_version: self.firmware_version.clone(),
            legacy_firmware: self.legacy_firmware,
            modal: self.modal.clone(),
            extents: self.extents.render(),
        }
    }
}
