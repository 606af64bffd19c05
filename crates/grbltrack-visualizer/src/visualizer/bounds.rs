//! Extent accumulator for toolpaths and traversed positions.

use grbltrack_core::{TravelEnvelope, XyPoint, XyzPoint};

/// Angular step used when sampling arcs, in degrees
pub const ARC_SAMPLE_STEP_DEG: f64 = 5.0;

const FULL_TURN_SAMPLES: usize = 72;

/// Linear axis tracked by [`BoundingBox`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Bounding box accumulator used while replaying toolpaths and positions.
///
/// Every axis starts at the `(+inf, -inf)` sentinel and only becomes
/// meaningful once a value has been absorbed on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Return every axis to the empty sentinel
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn absorb_point(&mut self, axis: Axis, value: f64) {
        let (min, max) = match axis {
            Axis::X => (&mut self.min_x, &mut self.max_x),
            Axis::Y => (&mut self.min_y, &mut self.max_y),
            Axis::Z => (&mut self.min_z, &mut self.max_z),
        };
        *min = min.min(value);
        *max = max.max(value);
    }

    /// Absorb whichever coordinates a move supplies; absent ones are left alone
    pub fn absorb_linear_move(&mut self, x: Option<f64>, y: Option<f64>, z: Option<f64>) {
        if let Some(x) = x {
            self.absorb_point(Axis::X, x);
        }
        if let Some(y) = y {
            self.absorb_point(Axis::Y, y);
        }
        if let Some(z) = z {
            self.absorb_point(Axis::Z, z);
        }
    }

    pub fn absorb_position(&mut self, position: &XyzPoint) {
        self.absorb_point(Axis::X, position.x);
        self.absorb_point(Axis::Y, position.y);
        self.absorb_point(Axis::Z, position.z);
    }

    /// Absorb a circular arc by sampling it every [`ARC_SAMPLE_STEP_DEG`].
    ///
    /// Sampling starts at `start_deg` and walks towards `start_deg + sweep_deg`
    /// in the direction of the sweep sign, stopping before the end angle and
    /// after at most one full turn. True extrema that fall between samples are
    /// not covered; callers that need exact circle extents should use
    /// `center ± radius`.
    pub fn absorb_arc(
        &mut self,
        center_x: f64,
        center_y: f64,
        radius: f64,
        start_deg: f64,
        sweep_deg: f64,
    ) {
        if !sweep_deg.is_finite() || !start_deg.is_finite() {
            tracing::trace!("Skipping arc with non-finite angles");
            return;
        }

        // Samples past one full turn repeat earlier ones
        let samples = (sweep_deg.abs() / ARC_SAMPLE_STEP_DEG)
            .ceil()
            .min(FULL_TURN_SAMPLES as f64) as usize;
        let step = ARC_SAMPLE_STEP_DEG.copysign(sweep_deg);
        for k in 0..samples {
            let rad = (start_deg + k as f64 * step).to_radians();
            self.absorb_point(Axis::X, center_x + radius * rad.cos());
            self.absorb_point(Axis::Y, center_y + radius * rad.sin());
        }
    }

    /// Whether the axis has absorbed at least one value
    pub fn has_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.min_x <= self.max_x,
            Axis::Y => self.min_y <= self.max_y,
            Axis::Z => self.min_z <= self.max_z,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_axis(Axis::X) && !self.has_axis(Axis::Y) && !self.has_axis(Axis::Z)
    }

    /// Extent along an axis; 0 when nothing was absorbed on it
    pub fn dimension(&self, axis: Axis) -> f64 {
        if !self.has_axis(axis) {
            return 0.0;
        }
        match axis {
            Axis::X => self.max_x - self.min_x,
            Axis::Y => self.max_y - self.min_y,
            Axis::Z => self.max_z - self.min_z,
        }
    }

    pub fn dim_x(&self) -> f64 {
        self.dimension(Axis::X)
    }

    pub fn dim_y(&self) -> f64 {
        self.dimension(Axis::Y)
    }

    pub fn dim_z(&self) -> f64 {
        self.dimension(Axis::Z)
    }

    pub fn area(&self) -> f64 {
        self.dim_x() * self.dim_y()
    }

    /// XY midpoint, or `None` while X or Y is still empty
    pub fn center(&self) -> Option<XyPoint> {
        if !self.has_axis(Axis::X) || !self.has_axis(Axis::Y) {
            return None;
        }
        Some(XyPoint::new(
            self.min_x + (self.max_x - self.min_x) / 2.0,
            self.min_y + (self.max_y - self.min_y) / 2.0,
        ))
    }

    /// Human-readable min/max table; empty axes print `unknown`
    pub fn render(&self) -> String {
        let row = |label: &str, axis: Axis, min: f64, max: f64| {
            if self.has_axis(axis) {
                format!("{}:{:8.3} |{:8.3}", label, min, max)
            } else {
                format!("{}: unknown | unknown", label)
            }
        };

        [
            "    Min.   | Max.".to_string(),
            row("X", Axis::X, self.min_x, self.max_x),
            row("Y", Axis::Y, self.min_y, self.max_y),
            row("Z", Axis::Z, self.min_z, self.max_z),
        ]
        .join("\n")
    }

    /// Check whether the box, placed relative to the current work position,
    /// stays inside the machine's travel envelope.
    ///
    /// `machine` and `work` are the controller's current machine and work
    /// positions; box coordinates are work coordinates. An empty box is never
    /// within limits.
    pub fn is_within_limits(
        &self,
        machine: &XyzPoint,
        work: &XyzPoint,
        envelope: &TravelEnvelope,
    ) -> bool {
        if !self.has_axis(Axis::X) || !self.has_axis(Axis::Y) {
            return false;
        }
        Self::is_offset_within_limits(
            machine,
            self.min_x - work.x,
            self.min_y - work.y,
            envelope,
        ) && Self::is_offset_within_limits(
            machine,
            self.max_x - work.x,
            self.max_y - work.y,
            envelope,
        )
    }

    /// Check whether moving `(dx, dy)` away from `machine` stays inside the envelope
    pub fn is_offset_within_limits(
        machine: &XyzPoint,
        dx: f64,
        dy: f64,
        envelope: &TravelEnvelope,
    ) -> bool {
        envelope.contains_xy(machine.x + dx, machine.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_points_and_area() {
        let mut bounds = BoundingBox::new();
        for (x, y) in [(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)] {
            bounds.absorb_linear_move(Some(x), Some(y), None);
        }
        assert_eq!(bounds.min_x, -2.0);
        assert_eq!(bounds.max_x, 4.0);
        assert_eq!(bounds.min_y, -1.0);
        assert_eq!(bounds.max_y, 5.0);
        assert_eq!(bounds.area(), 36.0);
        assert!(!bounds.has_axis(Axis::Z));
        assert_eq!(bounds.dim_z(), 0.0);
    }

    #[test]
    fn test_missing_coordinates_leave_sentinel() {
        let mut bounds = BoundingBox::new();
        bounds.absorb_linear_move(None, Some(2.0), None);
        assert!(!bounds.has_axis(Axis::X));
        assert_eq!(bounds.min_x, f64::INFINITY);
        assert_eq!(bounds.max_x, f64::NEG_INFINITY);
        assert!(bounds.has_axis(Axis::Y));
        assert_eq!(bounds.area(), 0.0);
    }

    #[test]
    fn test_center_guarded_when_empty() {
        let mut bounds = BoundingBox::new();
        assert!(bounds.is_empty());
        assert_eq!(bounds.center(), None);

        bounds.absorb_linear_move(Some(0.0), Some(0.0), None);
        bounds.absorb_linear_move(Some(10.0), Some(4.0), None);
        assert_eq!(bounds.center(), Some(XyPoint::new(5.0, 2.0)));
    }

    #[test]
    fn test_render_empty_reports_unknown() {
        let text = BoundingBox::new().render();
        assert!(text.contains("X: unknown | unknown"));
        assert!(text.contains("Y: unknown | unknown"));
        assert!(text.contains("Z: unknown | unknown"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn test_render_values() {
        let mut bounds = BoundingBox::new();
        bounds.absorb_position(&XyzPoint::new(-1.5, 2.0, 0.0));
        bounds.absorb_position(&XyzPoint::new(10.0, 20.25, -3.0));
        let text = bounds.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    Min.   | Max.");
        assert_eq!(lines[1], "X:  -1.500 |  10.000");
        assert_eq!(lines[2], "Y:   2.000 |  20.250");
        assert_eq!(lines[3], "Z:  -3.000 |   0.000");
    }

    #[test]
    fn test_absorb_full_circle_samples() {
        let mut bounds = BoundingBox::new();
        bounds.absorb_arc(0.0, 0.0, 10.0, 0.0, 360.0);
        assert!((bounds.max_x - 10.0).abs() < 1e-9);
        assert!((bounds.min_x + 10.0).abs() < 1e-9);
        assert!((bounds.max_y - 10.0).abs() < 1e-9);
        assert!((bounds.min_y + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_absorb_arc_negative_sweep() {
        let mut bounds = BoundingBox::new();
        // Clockwise quarter from 90° down to 0°, end angle itself is not sampled
        bounds.absorb_arc(0.0, 0.0, 10.0, 90.0, -90.0);
        assert!((bounds.max_y - 10.0).abs() < 1e-9);
        assert!(bounds.max_x < 10.0);
        assert!(bounds.max_x > 9.9);
        assert!(bounds.min_y > 0.0);
    }

    #[test]
    fn test_absorb_arc_zero_sweep_is_noop() {
        let mut bounds = BoundingBox::new();
        bounds.absorb_arc(0.0, 0.0, 10.0, 45.0, 0.0);
        assert!(bounds.is_empty());
    }

    #[test]
    fn test_absorb_arc_large_angles_terminate() {
        let mut bounds = BoundingBox::new();
        bounds.absorb_arc(0.0, 0.0, 1.0, 1.0e17, 90.0);
        assert!(bounds.has_axis(Axis::X));
        assert!(bounds.max_x <= 1.0 && bounds.min_x >= -1.0);

        let mut wound = BoundingBox::new();
        wound.absorb_arc(0.0, 0.0, 2.0, 0.0, -1.0e12);
        let mut circle = BoundingBox::new();
        circle.absorb_arc(0.0, 0.0, 2.0, 0.0, -360.0);
        assert_eq!(wound, circle);
    }

    #[test]
    fn test_within_limits() {
        let envelope = TravelEnvelope {
            home_x: -300.0,
            range_x: 300.0,
            home_y: -200.0,
            range_y: 200.0,
            ..Default::default()
        };
        let mut bounds = BoundingBox::new();
        bounds.absorb_linear_move(Some(0.0), Some(0.0), None);
        bounds.absorb_linear_move(Some(100.0), Some(50.0), None);

        // Work origin sits at machine (-250, -150)
        let machine = XyzPoint::new(-250.0, -150.0, 0.0);
        let work = XyzPoint::new(0.0, 0.0, 0.0);
        assert!(bounds.is_within_limits(&machine, &work, &envelope));

        // Work origin at machine (-50, -150): X max lands at +50
        let machine = XyzPoint::new(-50.0, -150.0, 0.0);
        assert!(!bounds.is_within_limits(&machine, &work, &envelope));

        assert!(!BoundingBox::new().is_within_limits(&machine, &work, &envelope));
    }

    #[test]
    fn test_is_offset_within_limits() {
        let envelope = TravelEnvelope::default();
        let machine = XyzPoint::new(100.0, 100.0, 0.0);
        assert!(BoundingBox::is_offset_within_limits(&machine, 50.0, -50.0, &envelope));
        assert!(!BoundingBox::is_offset_within_limits(&machine, 150.0, 0.0, &envelope));
        assert!(!BoundingBox::is_offset_within_limits(&machine, 0.0, -100.5, &envelope));
    }
}
