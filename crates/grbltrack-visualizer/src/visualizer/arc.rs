//! Arc geometry for G2/G3 moves and running tangent angles along a toolpath.

use std::f64::consts::PI;

use grbltrack_core::XyPoint;
use serde::{Deserialize, Serialize};

const FULL_TURN: f64 = 2.0 * PI;

/// Sweep direction of a circular move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    /// G2
    Clockwise,
    /// G3
    CounterClockwise,
}

impl ArcDirection {
    /// Map a modal motion number to an arc direction (2 and 3 only)
    pub fn from_motion(motion: u8) -> Option<Self> {
        match motion {
            2 => Some(Self::Clockwise),
            3 => Some(Self::CounterClockwise),
            _ => None,
        }
    }
}

/// Direction hint for [`TangentTracker::next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionDirection {
    Clockwise,
    CounterClockwise,
    /// Straight moves; the angle is kept within half a turn of the previous one
    Undirected,
}

impl From<ArcDirection> for MotionDirection {
    fn from(direction: ArcDirection) -> Self {
        match direction {
            ArcDirection::Clockwise => MotionDirection::Clockwise,
            ArcDirection::CounterClockwise => MotionDirection::CounterClockwise,
        }
    }
}

impl MotionDirection {
    /// Direction for a modal motion number; anything but 2/3 is undirected
    pub fn from_motion(motion: u8) -> Self {
        ArcDirection::from_motion(motion)
            .map(Self::from)
            .unwrap_or(Self::Undirected)
    }
}

/// Derived parameters of a circular move.
///
/// Angles are in radians. `angle_diff` is negative for a clockwise sweep and
/// positive for a counter-clockwise one; a full circle is `±2π`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcProperties {
    pub center: XyPoint,
    pub radius: f64,
    pub angle_start: f64,
    pub angle_end: f64,
    pub angle_diff: f64,
}

impl ArcProperties {
    /// True when the offsets described no circle at all
    pub fn is_degenerate(&self) -> bool {
        self.radius == 0.0
    }

    pub fn angle_start_deg(&self) -> f64 {
        self.angle_start.to_degrees()
    }

    pub fn angle_diff_deg(&self) -> f64 {
        self.angle_diff.to_degrees()
    }
}

/// Angle of the vector `(dx, dy)` from the arccosine of its normalised X part
fn vector_angle(dx: f64, dy: f64, radius: f64) -> f64 {
    let cos = (dx / radius).clamp(-1.0, 1.0);
    let angle = cos.acos();
    if dy < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Compute center, radius and angles of an arc from `p_old` to `p_new`.
///
/// `i`/`j` are the center offsets relative to `p_old`; missing ones count as
/// 0. A zero radius returns the center with all angles at 0, and callers
/// should treat the move as linear. Coincident start and end points describe
/// a full circle.
pub fn compute_arc(
    p_old: &XyPoint,
    p_new: &XyPoint,
    i: Option<f64>,
    j: Option<f64>,
    direction: ArcDirection,
) -> ArcProperties {
    let i = i.unwrap_or(0.0);
    let j = j.unwrap_or(0.0);

    let mut arc = ArcProperties {
        center: XyPoint::new(p_old.x + i, p_old.y + j),
        radius: (i * i + j * j).sqrt(),
        ..Default::default()
    };
    if arc.radius == 0.0 {
        tracing::trace!("Arc from {} has zero radius", p_old);
        return arc;
    }

    arc.angle_start = vector_angle(-i, -j, arc.radius);
    arc.angle_end = vector_angle(
        p_new.x - arc.center.x,
        p_new.y - arc.center.y,
        arc.radius,
    );

    arc.angle_diff = match direction {
        ArcDirection::Clockwise => arc.angle_end - arc.angle_start - FULL_TURN,
        ArcDirection::CounterClockwise => (arc.angle_end - arc.angle_start + FULL_TURN).abs(),
    };
    if arc.angle_diff > FULL_TURN {
        arc.angle_diff -= FULL_TURN;
    }
    if arc.angle_diff < -FULL_TURN {
        arc.angle_diff += FULL_TURN;
    }

    if p_old.x == p_new.x && p_old.y == p_new.y {
        arc.angle_diff = match direction {
            ArcDirection::Clockwise => -FULL_TURN,
            ArcDirection::CounterClockwise => FULL_TURN,
        };
    }
    arc
}

/// Bearing from `from` to `to` in radians, within `[-π/2, 3π/2)`.
///
/// Coincident points have bearing 0.
pub fn bearing(from: &XyPoint, to: &XyPoint) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx == 0.0 {
        if dy == 0.0 {
            0.0
        } else if dy > 0.0 {
            PI / 2.0
        } else {
            3.0 * PI / 2.0
        }
    } else if dy == 0.0 {
        if dx > 0.0 {
            0.0
        } else {
            PI
        }
    } else {
        let angle = (dy / dx).atan();
        if dx < 0.0 {
            angle + PI
        } else {
            angle
        }
    }
}

/// Produces a continuous tangent angle across consecutive segments.
///
/// Raw bearings wrap at a full turn; the tracker accumulates `±2π` so that a
/// clockwise path keeps decreasing and a counter-clockwise one keeps
/// increasing. Use one tracker per toolpath and [`reset`](Self::reset) it
/// between independent paths.
#[derive(Debug, Clone, Default)]
pub struct TangentTracker {
    last_angle: Option<f64>,
    unwrap: f64,
}

impl TangentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwrapped tangent angle of the segment `p_old -> p_new`, plus `offset`
    pub fn next(
        &mut self,
        p_old: &XyPoint,
        p_new: &XyPoint,
        offset: f64,
        direction: MotionDirection,
    ) -> f64 {
        let raw = bearing(p_old, p_new) + offset;

        if let Some(last) = self.last_angle {
            let diff = raw + self.unwrap - last;
            match direction {
                MotionDirection::Clockwise => {
                    if diff > 0.0 {
                        self.unwrap -= FULL_TURN;
                    }
                }
                MotionDirection::CounterClockwise => {
                    if diff < 0.0 {
                        self.unwrap += FULL_TURN;
                    }
                }
                MotionDirection::Undirected => {
                    if diff > PI {
                        self.unwrap -= FULL_TURN;
                    }
                    if diff < -PI {
                        self.unwrap += FULL_TURN;
                    }
                }
            }
        }

        let angle = raw + self.unwrap;
        self.last_angle = Some(angle);
        angle
    }

    /// Cumulative `±2π` correction applied so far
    pub fn unwrap_offset(&self) -> f64 {
        self.unwrap
    }

    pub fn reset(&mut self) {
        self.last_angle = None;
        self.unwrap = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_quarter_arc_clockwise() {
        // (10,0) around the origin to (0,-10)
        let arc = compute_arc(
            &XyPoint::new(10.0, 0.0),
            &XyPoint::new(0.0, -10.0),
            Some(-10.0),
            Some(0.0),
            ArcDirection::Clockwise,
        );
        assert!(close(arc.radius, 10.0));
        assert_eq!(arc.center, XyPoint::new(0.0, 0.0));
        assert!(close(arc.angle_start, 0.0));
        assert!(close(arc.angle_end, -PI / 2.0));
        assert!(close(arc.angle_diff, -PI / 2.0));
    }

    #[test]
    fn test_quarter_arc_counter_clockwise() {
        let arc = compute_arc(
            &XyPoint::new(10.0, 0.0),
            &XyPoint::new(0.0, 10.0),
            Some(-10.0),
            None,
            ArcDirection::CounterClockwise,
        );
        assert!(close(arc.angle_start, 0.0));
        assert!(close(arc.angle_end, PI / 2.0));
        assert!(close(arc.angle_diff, PI / 2.0));
    }

    #[test]
    fn test_three_quarter_arc_clockwise() {
        // (10,0) clockwise the long way round to (0,10)
        let arc = compute_arc(
            &XyPoint::new(10.0, 0.0),
            &XyPoint::new(0.0, 10.0),
            Some(-10.0),
            Some(0.0),
            ArcDirection::Clockwise,
        );
        assert!(close(arc.angle_diff, -3.0 * PI / 2.0));
    }

    #[test]
    fn test_full_circle() {
        let p = XyPoint::new(5.0, 5.0);
        let cw = compute_arc(&p, &p, Some(0.0), Some(-5.0), ArcDirection::Clockwise);
        assert!(close(cw.angle_diff, -2.0 * PI));
        assert_eq!(cw.center, XyPoint::new(5.0, 0.0));

        let ccw = compute_arc(&p, &p, Some(0.0), Some(-5.0), ArcDirection::CounterClockwise);
        assert!(close(ccw.angle_diff, 2.0 * PI));
    }

    #[test]
    fn test_zero_radius_is_degenerate() {
        let p = XyPoint::new(3.0, 4.0);
        let arc = compute_arc(&p, &p, None, None, ArcDirection::Clockwise);
        assert!(arc.is_degenerate());
        assert_eq!(arc.center, p);
        assert_eq!(arc.angle_start, 0.0);
        assert_eq!(arc.angle_end, 0.0);
        assert_eq!(arc.angle_diff, 0.0);
    }

    #[test]
    fn test_bearing_axes_and_quadrants() {
        let o = XyPoint::new(0.0, 0.0);
        assert_eq!(bearing(&o, &o), 0.0);
        assert!(close(bearing(&o, &XyPoint::new(1.0, 0.0)), 0.0));
        assert!(close(bearing(&o, &XyPoint::new(0.0, 1.0)), PI / 2.0));
        assert!(close(bearing(&o, &XyPoint::new(-1.0, 0.0)), PI));
        assert!(close(bearing(&o, &XyPoint::new(0.0, -1.0)), 3.0 * PI / 2.0));
        assert!(close(bearing(&o, &XyPoint::new(1.0, -1.0)), -PI / 4.0));
        assert!(close(bearing(&o, &XyPoint::new(-1.0, -1.0)), 5.0 * PI / 4.0));
    }

    fn circle_points(steps: usize, clockwise: bool) -> Vec<XyPoint> {
        (0..=steps)
            .map(|k| {
                let t = FULL_TURN * k as f64 / steps as f64;
                let t = if clockwise { -t } else { t };
                XyPoint::new(10.0 * t.cos(), 10.0 * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_tracker_counter_clockwise_keeps_increasing() {
        let points = circle_points(36, false);
        let mut tracker = TangentTracker::new();
        let mut previous = f64::NEG_INFINITY;
        for pair in points.windows(2) {
            let angle = tracker.next(&pair[0], &pair[1], 0.0, MotionDirection::CounterClockwise);
            assert!(angle > previous);
            previous = angle;
        }
        assert!(tracker.unwrap_offset() > 0.0);
    }

    #[test]
    fn test_tracker_clockwise_keeps_decreasing() {
        let points = circle_points(36, true);
        let mut tracker = TangentTracker::new();
        let mut previous = f64::INFINITY;
        for pair in points.windows(2) {
            let angle = tracker.next(&pair[0], &pair[1], 0.0, MotionDirection::Clockwise);
            assert!(angle < previous);
            previous = angle;
        }
    }

    #[test]
    fn test_tracker_undirected_wraps_half_turn() {
        let mut tracker = TangentTracker::new();
        let o = XyPoint::new(0.0, 0.0);
        let first = tracker.next(&o, &XyPoint::new(1.0, -0.1), 0.0, MotionDirection::Undirected);
        assert!(first < 0.0);
        // Raw bearing just under 3π/2 is equivalent to just under -π/2
        let second = tracker.next(&o, &XyPoint::new(-0.1, -1.0), 0.0, MotionDirection::Undirected);
        assert!((second - first).abs() < PI);
        assert!(close(tracker.unwrap_offset(), -FULL_TURN));
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = TangentTracker::new();
        let o = XyPoint::new(0.0, 0.0);
        tracker.next(&o, &XyPoint::new(1.0, -0.1), 0.0, MotionDirection::Undirected);
        tracker.next(&o, &XyPoint::new(-0.1, -1.0), 0.0, MotionDirection::Undirected);
        tracker.reset();
        assert_eq!(tracker.unwrap_offset(), 0.0);
        let angle = tracker.next(&o, &XyPoint::new(0.0, 1.0), 0.5, MotionDirection::Clockwise);
        assert!(close(angle, PI / 2.0 + 0.5));
    }

    #[test]
    fn test_direction_from_motion() {
        assert_eq!(ArcDirection::from_motion(2), Some(ArcDirection::Clockwise));
        assert_eq!(ArcDirection::from_motion(3), Some(ArcDirection::CounterClockwise));
        assert_eq!(ArcDirection::from_motion(1), None);
        assert_eq!(MotionDirection::from_motion(0), MotionDirection::Undirected);
        assert_eq!(MotionDirection::from_motion(2), MotionDirection::Clockwise);
    }
}
