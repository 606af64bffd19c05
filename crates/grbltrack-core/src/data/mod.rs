//! Data models for positions, axes and machine information
//!
//! This module provides:
//! - 2D points for arc and bearing math
//! - Position tracking with full 6-axis support (X, Y, Z, A, B, C)
//! - Sticky presence tracking for the optional rotary axes
//! - Unit management (MM, INCH)
//! - Travel envelope and display options consumed from configuration

pub mod machine;

pub use machine::{DisplayOptions, TravelEnvelope};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing positions reported by the controller
pub const POSITION_TOLERANCE: f64 = 0.00001;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    /// Millimeters (metric)
    MM,
    /// Inches (imperial)
    INCH,
    /// Unknown or uninitialized
    Unknown,
}

impl Units {
    /// Convert a value from one unit to another
    ///
    /// Returns the original value if units are the same or unknown.
    pub fn convert(value: f64, from: Units, to: Units) -> f64 {
        if from == to {
            return value;
        }

        match (from, to) {
            (Units::MM, Units::INCH) => value / 25.4,
            (Units::INCH, Units::MM) => value * 25.4,
            _ => value,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
            Units::Unknown => write!(f, "unknown"),
        }
    }
}

/// Point in the XY plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl XyPoint {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum
    pub fn add(&self, other: &XyPoint) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference
    pub fn subtract(&self, other: &XyPoint) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Multiply both components by `factor`
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Divide both components by `divisor`
    pub fn divide(&self, divisor: f64) -> Self {
        Self::new(self.x / divisor, self.y / divisor)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &XyPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another point in degrees.
    ///
    /// Derived from the arccosine of the normalised X delta and negated when
    /// the target lies at a larger Y, so the result is in `[-180, 180]` with
    /// screen-style (Y down) orientation. Coincident points yield 0.
    pub fn angle_to(&self, other: &XyPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let radius = (dx * dx + dy * dy).sqrt();
        if radius == 0.0 {
            return 0.0;
        }
        let cosine = (dx / radius).clamp(-1.0, 1.0);
        let angle = cosine.acos().to_degrees();
        if dy > 0.0 {
            -angle
        } else {
            angle
        }
    }

    /// Compare with another point within [`POSITION_TOLERANCE`]
    pub fn almost_equal(&self, other: &XyPoint) -> bool {
        (self.x - other.x).abs() < POSITION_TOLERANCE && (self.y - other.y).abs() < POSITION_TOLERANCE
    }
}

impl From<XyzPoint> for XyPoint {
    fn from(point: XyzPoint) -> Self {
        Self::new(point.x, point.y)
    }
}

impl fmt::Display for XyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3}", self.x, self.y)
    }
}

/// Base CNC point structure representing a 6-axis coordinate
///
/// The rotary axes are always stored; whether they are meaningful is tracked
/// separately through [`AxisSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XyzPoint {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position
    pub z: f64,
    /// A-axis (4th axis) position
    pub a: f64,
    /// B-axis (5th axis) position
    pub b: f64,
    /// C-axis (6th axis) position
    pub c: f64,
}

impl XyzPoint {
    /// Create a point with the linear axes set and rotary axes at zero
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    /// Create a CNC point with specified 6-axis coordinates
    pub fn with_axes(x: f64, y: f64, z: f64, a: f64, b: f64, c: f64) -> Self {
        debug_assert!(
            x.is_finite()
                && y.is_finite()
                && z.is_finite()
                && a.is_finite()
                && b.is_finite()
                && c.is_finite(),
            "XyzPoint axes must be finite: x={x}, y={y}, z={z}, a={a}, b={b}, c={c}"
        );
        Self { x, y, z, a, b, c }
    }

    /// Component-wise sum over all six axes
    pub fn add(&self, other: &XyzPoint) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
            a: self.a + other.a,
            b: self.b + other.b,
            c: self.c + other.c,
        }
    }

    /// Component-wise difference over all six axes
    pub fn subtract(&self, other: &XyzPoint) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            a: self.a - other.a,
            b: self.b - other.b,
            c: self.c - other.c,
        }
    }

    /// Compare the linear axes within [`POSITION_TOLERANCE`]
    pub fn almost_equal(&self, other: &XyzPoint) -> bool {
        (self.x - other.x).abs() < POSITION_TOLERANCE
            && (self.y - other.y).abs() < POSITION_TOLERANCE
            && (self.z - other.z).abs() < POSITION_TOLERANCE
    }

    /// Value of an optional rotary axis
    pub fn axis(&self, axis: OptionalAxis) -> f64 {
        match axis {
            OptionalAxis::A => self.a,
            OptionalAxis::B => self.b,
            OptionalAxis::C => self.c,
        }
    }

    /// Set an optional rotary axis
    pub fn set_axis(&mut self, axis: OptionalAxis, value: f64) {
        match axis {
            OptionalAxis::A => self.a = value,
            OptionalAxis::B => self.b = value,
            OptionalAxis::C => self.c = value,
        }
    }

    /// Format the position for display.
    ///
    /// * `single_lines` - one axis per line instead of a compact row
    /// * `full` - show all six axes regardless of `fourth_axis`
    /// * `fourth_axis` - label of an active 4th axis, printed with the A value
    pub fn format(&self, single_lines: bool, full: bool, fourth_axis: Option<&str>) -> String {
        if full {
            return if single_lines {
                format!(
                    "X={:9.3}\nY={:9.3}\nZ={:9.3}\nA={:9.3}\nB={:9.3}\nC={:9.3}",
                    self.x, self.y, self.z, self.a, self.b, self.c
                )
            } else {
                format!(
                    "X={:9.3} Y={:9.3} Z={:9.3}\nA={:9.3} B={:9.3} C={:9.3}",
                    self.x, self.y, self.z, self.a, self.b, self.c
                )
            };
        }

        match (fourth_axis, single_lines) {
            (Some(name), true) => format!(
                "X={:9.3}\nY={:9.3}\nZ={:9.3}\n{}={:9.3}",
                self.x, self.y, self.z, name, self.a
            ),
            (Some(name), false) => format!(
                "X={:9.3}  Y={:9.3}  Z={:9.3}\n{}={:9.3}",
                self.x, self.y, self.z, name, self.a
            ),
            (None, true) => format!("X={:9.3}\nY={:9.3}\nZ={:9.3}", self.x, self.y, self.z),
            (None, false) => format!("X={:9.3} Y={:9.3} Z={:9.3}", self.x, self.y, self.z),
        }
    }
}

impl fmt::Display for XyzPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{:.3} Y:{:.3} Z:{:.3} A:{:.3} B:{:.3} C:{:.3}",
            self.x, self.y, self.z, self.a, self.b, self.c
        )
    }
}

/// Optional rotary axes beyond X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionalAxis {
    /// 4th axis
    A,
    /// 5th axis
    B,
    /// 6th axis
    C,
}

impl OptionalAxis {
    /// All optional axes in report order
    pub const ALL: [OptionalAxis; 3] = [OptionalAxis::A, OptionalAxis::B, OptionalAxis::C];

    /// Axis reported at the given zero-based value index (3 = A, 4 = B, 5 = C)
    pub fn from_report_index(index: usize) -> Option<Self> {
        match index {
            3 => Some(Self::A),
            4 => Some(Self::B),
            5 => Some(Self::C),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::A => 0b001,
            Self::B => 0b010,
            Self::C => 0b100,
        }
    }
}

impl fmt::Display for OptionalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
        }
    }
}

/// Set of optional axes seen in controller reports
///
/// Presence is sticky: axes are only ever added until the set is cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSet(u8);

impl AxisSet {
    /// Set with no optional axes
    pub const EMPTY: AxisSet = AxisSet(0);

    /// Mark an axis as present
    pub fn insert(&mut self, axis: OptionalAxis) {
        self.0 |= axis.bit();
    }

    /// Check whether an axis has been seen
    pub fn contains(&self, axis: OptionalAxis) -> bool {
        self.0 & axis.bit() != 0
    }

    /// True when no optional axis has been seen
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of optional axes seen
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Forget all axes
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterate present axes in A, B, C order
    pub fn iter(&self) -> impl Iterator<Item = OptionalAxis> + '_ {
        OptionalAxis::ALL
            .into_iter()
            .filter(move |axis| self.contains(*axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xy_arithmetic() {
        let p = XyPoint::new(1.0, 2.0);
        let q = XyPoint::new(3.0, -4.0);
        assert_eq!(p.add(&q), XyPoint::new(4.0, -2.0));
        assert_eq!(p.subtract(&q), XyPoint::new(-2.0, 6.0));
        assert_eq!(p.scale(2.0), XyPoint::new(2.0, 4.0));
        assert_eq!(q.divide(2.0), XyPoint::new(1.5, -2.0));
    }

    #[test]
    fn test_distance() {
        let p = XyPoint::new(0.0, 0.0);
        let q = XyPoint::new(3.0, 4.0);
        assert_eq!(p.distance_to(&q), 5.0);
        assert_eq!(q.distance_to(&p), 5.0);
    }

    #[test]
    fn test_angle_to_axes() {
        let origin = XyPoint::default();
        assert_eq!(origin.angle_to(&XyPoint::new(10.0, 0.0)), 0.0);
        assert_eq!(origin.angle_to(&XyPoint::new(-10.0, 0.0)), 180.0);
        assert!((origin.angle_to(&XyPoint::new(0.0, 10.0)) + 90.0).abs() < 1e-9);
        assert!((origin.angle_to(&XyPoint::new(0.0, -10.0)) - 90.0).abs() < 1e-9);
        assert!((origin.angle_to(&XyPoint::new(1.0, 1.0)) + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_to_self_is_zero() {
        let p = XyPoint::new(12.5, -3.0);
        assert_eq!(p.angle_to(&p), 0.0);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_xyz_arithmetic_covers_rotary_axes() {
        let p = XyzPoint::with_axes(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let q = XyzPoint::with_axes(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(p.subtract(&q), XyzPoint::with_axes(0.0, 1.0, 2.0, 3.0, 4.0, 5.0));
        assert_eq!(p.add(&q).c, 7.0);
    }

    #[test]
    fn test_almost_equal_ignores_rotary() {
        let p = XyzPoint::with_axes(1.0, 2.0, 3.0, 0.0, 0.0, 0.0);
        let q = XyzPoint::with_axes(1.000001, 2.0, 3.0, 90.0, 0.0, 0.0);
        assert!(p.almost_equal(&q));
        assert!(!p.almost_equal(&XyzPoint::new(1.1, 2.0, 3.0)));
    }

    #[test]
    fn test_format_compact() {
        let p = XyzPoint::new(1.0, -2.5, 10.0);
        assert_eq!(
            p.format(false, false, None),
            "X=    1.000 Y=   -2.500 Z=   10.000"
        );
    }

    #[test]
    fn test_format_single_lines_with_fourth_axis() {
        let p = XyzPoint::with_axes(1.0, 2.0, 3.0, 45.0, 0.0, 0.0);
        assert_eq!(
            p.format(true, false, Some("U")),
            "X=    1.000\nY=    2.000\nZ=    3.000\nU=   45.000"
        );
    }

    #[test]
    fn test_format_full() {
        let p = XyzPoint::with_axes(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let text = p.format(false, true, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("A=    4.000"));
        assert!(lines[1].ends_with("C=    6.000"));
    }

    #[test]
    fn test_axis_set_is_sticky_and_ordered() {
        let mut axes = AxisSet::default();
        assert!(axes.is_empty());
        axes.insert(OptionalAxis::C);
        axes.insert(OptionalAxis::A);
        axes.insert(OptionalAxis::A);
        assert_eq!(axes.len(), 2);
        assert!(axes.contains(OptionalAxis::A));
        assert!(!axes.contains(OptionalAxis::B));
        assert_eq!(
            axes.iter().collect::<Vec<_>>(),
            vec![OptionalAxis::A, OptionalAxis::C]
        );
        axes.clear();
        assert_eq!(axes, AxisSet::EMPTY);
    }

    #[test]
    fn test_units_convert() {
        assert_eq!(Units::convert(25.4, Units::MM, Units::INCH), 1.0);
        assert_eq!(Units::convert(1.0, Units::INCH, Units::MM), 25.4);
        assert_eq!(Units::convert(3.0, Units::Unknown, Units::MM), 3.0);
    }
}
