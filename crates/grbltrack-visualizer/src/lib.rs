//! # GrblTrack Visualizer
//!
//! Toolpath geometry and G-code modal state for GrblTrack.
//! Includes the modal parser, the arc geometry engine, the tangent tracker
//! and the bounding-box accumulator.

pub mod gcode;
pub mod visualizer;

pub use gcode::{parse_word_value, ModalParser, ModalState};

pub use visualizer::{
    bearing, compute_arc, ArcDirection, ArcProperties, Axis, BoundingBox, MotionDirection,
    TangentTracker, ARC_SAMPLE_STEP_DEG,
};
