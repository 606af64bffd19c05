//! Replay of captured controller output
//!
//! Feeds the lines of a controller log into a [`Session`] and renders the
//! resulting state as a plain-text report.

use std::fmt::Write;
use std::path::Path;

use grbltrack_communication::firmware::grbl::COORDINATE_IDS;
use grbltrack_communication::{LineKind, Session};
use grbltrack_core::{ParseError, Result, TravelEnvelope};
use serde::{Deserialize, Serialize};

/// Counters collected while replaying a capture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    /// Lines processed, including blank ones
    pub lines: usize,
    /// Status reports decoded
    pub status_reports: usize,
    /// `error:n` responses
    pub errors: usize,
    /// Errors attributable to the G-code program rather than the machine
    pub program_errors: usize,
    /// `ALARM:n` responses
    pub alarms: usize,
    /// Reports that could not be decoded
    pub malformed: usize,
}

impl ReplaySummary {
    /// Apply one line to the session and count it, returning the
    /// malformed-report reason if the line could not be decoded
    fn record(&mut self, session: &mut Session, line: &str) -> Option<String> {
        self.lines += 1;
        match session.process_line(line) {
            LineKind::Status(_) => self.status_reports += 1,
            LineKind::Error(code) => {
                self.errors += 1;
                if grbltrack_communication::is_error_line_caused_by_program(line) {
                    self.program_errors += 1;
                }
                tracing::warn!(
                    "line {}: error {}: {}",
                    self.lines,
                    code,
                    session.error_message(&code)
                );
            }
            LineKind::Alarm(code) => {
                self.alarms += 1;
                tracing::warn!(
                    "line {}: alarm {}: {}",
                    self.lines,
                    code,
                    session.alarm_message(&code)
                );
            }
            LineKind::Malformed(reason) => {
                self.malformed += 1;
                tracing::debug!("line {}: malformed: {}", self.lines, reason);
                return Some(reason);
            }
            _ => {}
        }
        None
    }
}

/// Process every line, logging errors and alarms with their catalog text
pub fn replay_lines<'a, I>(session: &mut Session, lines: I) -> ReplaySummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = ReplaySummary::default();
    for line in lines {
        summary.record(session, line);
    }
    summary
}

/// Replay a capture file line by line.
///
/// With `strict` set the first malformed report stops the replay and is
/// returned with its line number; otherwise malformed lines are counted.
pub fn replay_file(session: &mut Session, path: &Path, strict: bool) -> Result<ReplaySummary> {
    let text = std::fs::read_to_string(path)?;
    let mut summary = ReplaySummary::default();
    for line in text.lines() {
        if let Some(reason) = summary.record(session, line) {
            if strict {
                return Err(ParseError::MalformedReport {
                    reason: format!("line {}: {}", summary.lines, reason),
                }
                .into());
            }
        }
    }
    Ok(summary)
}

/// Render the session state as a text report
pub fn render_report(
    session: &Session,
    summary: &ReplaySummary,
    envelope: &TravelEnvelope,
) -> String {
    let mut out = String::new();
    let snapshot = session.snapshot();

    let _ = writeln!(
        out,
        "Firmware: {}{}",
        session.firmware_version().unwrap_or("unknown"),
        if session.is_legacy_firmware() {
            " (legacy)"
        } else {
            ""
        }
    );
    let _ = writeln!(out, "Status:   {}", session.status_display());
    let _ = writeln!(
        out,
        "MPos:     {}",
        session.format_position(&session.machine_position(), false, false)
    );
    let _ = writeln!(
        out,
        "WPos:     {}",
        session.format_position(&session.work_position(), false, false)
    );
    let _ = writeln!(
        out,
        "WCO:      {}",
        session.format_position(&session.work_offset(), false, false)
    );
    let _ = writeln!(
        out,
        "Feed:     {:.1}  Spindle: {:.1}",
        session.feed_rate(),
        session.spindle_speed()
    );
    if let Some(ov) = session.overrides() {
        let _ = writeln!(
            out,
            "Override: feed {}% rapid {}% spindle {}%",
            ov.feed, ov.rapid, ov.spindle
        );
    }
    let _ = writeln!(out, "Modal:    {}", session.modal_state().gcode_summary());

    let _ = writeln!(out, "\nCoordinates:");
    for id in COORDINATE_IDS {
        let _ = writeln!(out, "  {:<4}{}", id, session.display_coordinate(id));
    }
    if session.coordinate("PRB").is_some() {
        let _ = writeln!(
            out,
            "  probe {}",
            if session.probe_succeeded() {
                "touched"
            } else {
                "no contact"
            }
        );
    }

    if !snapshot.settings.is_empty() {
        let _ = writeln!(out, "\nSettings:");
        for (id, value) in &snapshot.settings {
            let _ = writeln!(
                out,
                "  ${}={} ({})",
                id,
                value,
                session.setting_message(&id.to_string())
            );
        }
    }

    let _ = writeln!(out, "\nExtents:\n{}", session.extents().render());
    let within = if session.extents().is_empty() {
        "n/a"
    } else if session.toolpath_within_limits(session.extents(), envelope) {
        "yes"
    } else {
        "no"
    };
    let _ = writeln!(out, "Within limits: {}", within);

    let _ = write!(
        out,
        "\nLines: {}  status: {}  errors: {} ({} program)  alarms: {}  malformed: {}",
        summary.lines,
        summary.status_reports,
        summary.errors,
        summary.program_errors,
        summary.alarms,
        summary.malformed
    );
    out
}
