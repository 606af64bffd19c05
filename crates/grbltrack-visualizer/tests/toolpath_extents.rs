//! Walks small G-code programs through the modal parser, arc engine and
//! extent tracker together

use grbltrack_core::XyPoint;
use grbltrack_visualizer::{
    compute_arc, Axis, BoundingBox, ModalParser, ModalState, MotionDirection, TangentTracker,
};

fn word(line: &str, letter: char) -> Option<f64> {
    let start = line.find(letter)? + 1;
    let rest = &line[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

fn walk(program: &str) -> (BoundingBox, ModalState) {
    let mut parser = ModalParser::new();
    let mut state = ModalState::default();
    let mut bounds = BoundingBox::new();
    let mut position = XyPoint::new(0.0, 0.0);

    for line in program.lines() {
        parser.update(line, &mut state);
        let x = word(line, 'X');
        let y = word(line, 'Y');
        if x.is_none() && y.is_none() {
            continue;
        }
        let target = XyPoint::new(x.unwrap_or(position.x), y.unwrap_or(position.y));

        match state.arc_direction() {
            Some(direction) => {
                let arc = compute_arc(&position, &target, word(line, 'I'), word(line, 'J'), direction);
                bounds.absorb_arc(
                    arc.center.x,
                    arc.center.y,
                    arc.radius,
                    arc.angle_start_deg(),
                    arc.angle_diff_deg(),
                );
                bounds.absorb_linear_move(Some(target.x), Some(target.y), None);
            }
            None => bounds.absorb_linear_move(x, y, word(line, 'Z')),
        }
        position = target;
    }
    (bounds, state)
}

#[test]
fn test_square_extents() {
    let (bounds, state) = walk("G0 X10 Y10\nG1 X20 Y10 F300\nG1 X20 Y20\nG1 X10 Y20\nG1 X10 Y10");
    assert_eq!(bounds.min_x, 10.0);
    assert_eq!(bounds.max_x, 20.0);
    assert_eq!(bounds.area(), 100.0);
    assert_eq!(bounds.center(), Some(XyPoint::new(15.0, 15.0)));
    assert_eq!(state.motion, 1);
    assert_eq!(state.feed_rate, 300.0);
    assert!(!bounds.has_axis(Axis::Z));
}

#[test]
fn test_full_circle_extents() {
    // Full counter-clockwise circle of radius 5 around (5, 0)
    let (bounds, _) = walk("G0 X0 Y0\nG3 X0 Y0 I5 J0");
    assert!((bounds.min_x - 0.0).abs() < 1e-9);
    assert!((bounds.max_x - 10.0).abs() < 1e-9);
    assert!((bounds.max_y - 5.0).abs() < 1e-9);
    assert!((bounds.min_y + 5.0).abs() < 1e-9);
}

#[test]
fn test_half_circle_clockwise_stays_on_top() {
    // Clockwise from (0,0) over the top to (10,0) around (5,0)
    let (bounds, _) = walk("G0 X0 Y0\nG2 X10 Y0 I5 J0");
    assert!((bounds.max_y - 5.0).abs() < 1e-9);
    assert!(bounds.min_y > -1e-9);
}

#[test]
fn test_tangent_angle_follows_polyline() {
    let corners = [
        XyPoint::new(0.0, 0.0),
        XyPoint::new(10.0, 0.0),
        XyPoint::new(10.0, 10.0),
        XyPoint::new(0.0, 10.0),
        XyPoint::new(0.0, 0.0),
        XyPoint::new(10.0, 0.0),
    ];
    let mut tracker = TangentTracker::new();
    let angles: Vec<f64> = corners
        .windows(2)
        .map(|pair| tracker.next(&pair[0], &pair[1], 0.0, MotionDirection::Undirected))
        .collect();

    // A counter-clockwise square turns by a quarter each corner without jumps
    for pair in angles.windows(2) {
        let step = pair[1] - pair[0];
        assert!((step - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
