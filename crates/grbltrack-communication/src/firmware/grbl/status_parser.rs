//! GRBL Status Report Parsing
//!
//! This module parses GRBL 1.1 status reports of the form
//! `<Idle|MPos:0.000,0.000,0.000|FS:0,0|WCO:0.000,0.000,0.000>` into machine
//! position, work position, coordinate offset, feed/spindle and override
//! state.

use grbltrack_core::{parse_value, AxisSet, OptionalAxis, ParseError, XyzPoint};
use serde::{Deserialize, Serialize};

use super::status::{decode_status, GrblStatus};

/// Parse a comma separated list of axis values
pub fn parse_axis_values(raw: &str) -> Result<Vec<f64>, ParseError> {
    raw.split(',').map(parse_value).collect()
}

/// Build a point from reported axis values.
///
/// A single value is a Z-only report (tool length offset). Three or more
/// values are X, Y, Z followed by the optional A, B, C axes; every optional
/// axis present is returned in the [`AxisSet`]. Two values carry no usable
/// position and produce the origin.
pub fn point_from_values(values: &[f64]) -> (XyzPoint, AxisSet) {
    let mut axes = AxisSet::EMPTY;
    let point = match values {
        [z] => XyzPoint::new(0.0, 0.0, *z),
        [x, y, z, rest @ ..] => {
            let mut point = XyzPoint::new(*x, *y, *z);
            for (index, value) in rest.iter().enumerate().take(3) {
                if let Some(axis) = OptionalAxis::from_report_index(index + 3) {
                    point.set_axis(axis, *value);
                    axes.insert(axis);
                }
            }
            point
        }
        _ => XyzPoint::default(),
    };
    (point, axes)
}

/// Override state (Feed, Rapid, Spindle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideState {
    /// Feed override percentage
    pub feed: u16,
    /// Rapid override percentage
    pub rapid: u16,
    /// Spindle override percentage
    pub spindle: u16,
}

impl OverrideState {
    /// Parse override state from string (format: "feed,rapid,spindle")
    pub fn parse(ov_str: &str) -> Option<Self> {
        let parts: Vec<&str> = ov_str.split(',').collect();

        if parts.len() < 3 {
            return None;
        }

        let feed = parts[0].trim().parse::<u16>().ok()?;
        let rapid = parts[1].trim().parse::<u16>().ok()?;
        let spindle = parts[2].trim().parse::<u16>().ok()?;

        Some(Self {
            feed,
            rapid,
            spindle,
        })
    }
}

/// Buffer state (format: "blocks,bytes")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferState {
    /// Free planner blocks
    pub blocks: u16,
    /// Free serial RX bytes
    pub bytes: u16,
}

impl BufferState {
    pub fn parse(buf_str: &str) -> Option<Self> {
        let (blocks, bytes) = buf_str.split_once(',')?;
        Some(Self {
            blocks: blocks.trim().parse().ok()?,
            bytes: bytes.trim().parse().ok()?,
        })
    }
}

/// Complete parsed status report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusReport {
    /// Decoded machine state
    pub status: GrblStatus,
    /// Raw state field, including any sub-state (`Hold:0`)
    pub state_text: String,
    /// Machine position
    pub mpos: Option<XyzPoint>,
    /// Work position
    pub wpos: Option<XyzPoint>,
    /// Work coordinate offset
    pub wco: Option<XyzPoint>,
    /// Optional axes present in any position field
    pub axes: AxisSet,
    /// Feed rate
    pub feed_rate: Option<f64>,
    /// Spindle speed
    pub spindle_speed: Option<f64>,
    /// Override state
    pub overrides: Option<OverrideState>,
    /// Buffer state
    pub buffer: Option<BufferState>,
}

/// Comprehensive status parsing
pub struct StatusParser;

impl StatusParser {
    /// Strip the angle brackets of a status report
    pub fn strip_brackets(status_line: &str) -> Option<&str> {
        status_line
            .trim()
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
    }

    /// Extract field value from status report
    pub fn extract_field<'a>(status_line: &'a str, field_name: &str) -> Option<&'a str> {
        let body = Self::strip_brackets(status_line).unwrap_or(status_line);
        body.split('|').skip(1).find_map(|field| {
            field
                .split_once(':')
                .filter(|(name, _)| *name == field_name)
                .map(|(_, value)| value)
        })
    }

    /// Parse a position field with three to six axes
    pub fn parse_position(raw: &str) -> Result<(XyzPoint, AxisSet), ParseError> {
        let values = parse_axis_values(raw)?;
        if values.len() < 3 || values.len() > 6 {
            return Err(ParseError::MalformedReport {
                reason: format!("expected 3 to 6 axis values, got {}", values.len()),
            });
        }
        Ok(point_from_values(&values))
    }

    /// Body of a status report, with or without the enclosing `<` `>`.
    ///
    /// A report that opens with `<` must also close with `>`.
    pub fn report_body(status_line: &str) -> Result<&str, ParseError> {
        let line = status_line.trim();
        if !line.starts_with('<') {
            return Ok(line);
        }
        Self::strip_brackets(line).ok_or_else(|| ParseError::MalformedReport {
            reason: "status report opened with '<' but not closed with '>'".to_string(),
        })
    }

    /// Whether the line is shaped like a status report: bracketed, or a
    /// `|`-separated line whose first field names a known state
    pub fn looks_like_report(line: &str) -> bool {
        let line = line.trim();
        if line.starts_with('<') {
            return true;
        }
        line.split_once('|')
            .is_some_and(|(state, _)| decode_status(state) != GrblStatus::Unknown)
    }

    /// Parse complete status line into all components.
    ///
    /// The enclosing angle brackets are optional. GRBL reports either `MPos`
    /// or `WPos` depending on `$10`, and sends `WCO` only every few reports.
    /// When one position space is missing and an offset is present in the
    /// same report, the other space is derived (`WPos = MPos - WCO`).
    /// Malformed fields are skipped.
    pub fn parse_full(status_line: &str) -> Result<StatusReport, ParseError> {
        let body = Self::report_body(status_line)?;

        let mut fields = body.split('|');
        let state_text = fields.next().unwrap_or_default();
        let mut report = StatusReport {
            status: decode_status(state_text),
            state_text: state_text.to_string(),
            ..Default::default()
        };

        for field in fields {
            let Some((name, value)) = field.split_once(':') else {
                tracing::trace!("Skipping status field without value: {}", field);
                continue;
            };
            match name {
                "MPos" | "WPos" | "WCO" => match Self::parse_position(value) {
                    Ok((point, axes)) => {
                        for axis in axes.iter() {
                            report.axes.insert(axis);
                        }
                        match name {
                            "MPos" => report.mpos = Some(point),
                            "WPos" => report.wpos = Some(point),
                            _ => report.wco = Some(point),
                        }
                    }
                    Err(e) => tracing::trace!("Skipping status field {}: {}", name, e),
                },
                "FS" => {
                    let mut parts = value.split(',');
                    report.feed_rate = parts.next().and_then(|v| parse_value(v).ok());
                    report.spindle_speed = parts.next().and_then(|v| parse_value(v).ok());
                }
                "F" => report.feed_rate = parse_value(value).ok(),
                "Ov" => report.overrides = OverrideState::parse(value),
                "Bf" => report.buffer = BufferState::parse(value),
                _ => tracing::trace!("Ignoring status field {}", name),
            }
        }

        if let Some(wco) = report.wco {
            match (report.mpos, report.wpos) {
                (Some(mpos), None) => report.wpos = Some(mpos.subtract(&wco)),
                (None, Some(wpos)) => report.mpos = Some(wpos.add(&wco)),
                _ => {}
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_from_values() {
        let (p, axes) = point_from_values(&[-28.208]);
        assert_eq!(p, XyzPoint::new(0.0, 0.0, -28.208));
        assert!(axes.is_empty());

        let (p, axes) = point_from_values(&[1.0, 2.0]);
        assert_eq!(p, XyzPoint::default());
        assert!(axes.is_empty());

        let (p, axes) = point_from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(p, XyzPoint::with_axes(1.0, 2.0, 3.0, 4.0, 5.0, 0.0));
        assert!(axes.contains(OptionalAxis::A));
        assert!(axes.contains(OptionalAxis::B));
        assert!(!axes.contains(OptionalAxis::C));
    }

    #[test]
    fn test_extract_field() {
        let line = "<Idle|MPos:1.000,2.000,3.000|FS:500,8000|Ov:100,100,100>";
        assert_eq!(
            StatusParser::extract_field(line, "MPos"),
            Some("1.000,2.000,3.000")
        );
        assert_eq!(StatusParser::extract_field(line, "FS"), Some("500,8000"));
        assert_eq!(StatusParser::extract_field(line, "F"), None);
        assert_eq!(StatusParser::extract_field(line, "WCO"), None);
    }

    #[test]
    fn test_parse_full_derives_wpos() {
        let report = StatusParser::parse_full(
            "<Run|MPos:10.000,20.000,-5.000|FS:300,12000|WCO:2.000,4.000,-1.000>",
        )
        .unwrap();
        assert_eq!(report.status, GrblStatus::Run);
        assert_eq!(report.mpos, Some(XyzPoint::new(10.0, 20.0, -5.0)));
        assert_eq!(report.wpos, Some(XyzPoint::new(8.0, 16.0, -4.0)));
        assert_eq!(report.feed_rate, Some(300.0));
        assert_eq!(report.spindle_speed, Some(12000.0));
    }

    #[test]
    fn test_parse_full_derives_mpos() {
        let report =
            StatusParser::parse_full("<Idle|WPos:1.000,1.000,1.000|F:0|WCO:1.000,2.000,3.000>")
                .unwrap();
        assert_eq!(report.mpos, Some(XyzPoint::new(2.0, 3.0, 4.0)));
        assert_eq!(report.feed_rate, Some(0.0));
        assert_eq!(report.spindle_speed, None);
    }

    #[test]
    fn test_parse_full_without_wco_keeps_single_space() {
        let report = StatusParser::parse_full("<Hold:0|MPos:1.000,2.000,3.000|Bf:15,128>").unwrap();
        assert_eq!(report.status, GrblStatus::Hold);
        assert_eq!(report.state_text, "Hold:0");
        assert!(report.wpos.is_none());
        assert_eq!(report.buffer, Some(BufferState { blocks: 15, bytes: 128 }));
    }

    #[test]
    fn test_parse_full_four_axes() {
        let report = StatusParser::parse_full(
            "<Idle|MPos:1.000,2.000,3.000,90.000|Ov:100,50,120>",
        )
        .unwrap();
        assert!(report.axes.contains(OptionalAxis::A));
        assert_eq!(report.mpos.map(|p| p.a), Some(90.0));
        assert_eq!(
            report.overrides,
            Some(OverrideState {
                feed: 100,
                rapid: 50,
                spindle: 120
            })
        );
    }

    #[test]
    fn test_parse_full_skips_malformed_fields() {
        let report = StatusParser::parse_full("<Idle|MPos:1.0,x,3.0|WPos:1,2|FS:a,b>").unwrap();
        assert_eq!(report.status, GrblStatus::Idle);
        assert!(report.mpos.is_none());
        assert!(report.wpos.is_none());
        assert!(report.feed_rate.is_none());
    }

    #[test]
    fn test_parse_full_without_brackets() {
        let report = StatusParser::parse_full("Idle|WPos:1.000,2.000,0.000").unwrap();
        assert_eq!(report.status, GrblStatus::Idle);
        assert_eq!(report.wpos, Some(XyzPoint::new(1.0, 2.0, 0.0)));
        assert!(report.mpos.is_none());
    }

    #[test]
    fn test_parse_full_requires_closing_bracket() {
        assert!(StatusParser::parse_full("<Idle|MPos:0,0,0").is_err());
    }

    #[test]
    fn test_looks_like_report() {
        assert!(StatusParser::looks_like_report("<Idle>"));
        assert!(StatusParser::looks_like_report("Run|MPos:1,2,3"));
        assert!(StatusParser::looks_like_report("Hold:0|WPos:1,2,3"));
        assert!(!StatusParser::looks_like_report("G1 X10|Y5"));
        assert!(!StatusParser::looks_like_report("Idle"));
    }
}
