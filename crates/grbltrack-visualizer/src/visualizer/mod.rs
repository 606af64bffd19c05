//! Toolpath geometry
//!
//! Arc parameters for G2/G3 moves, running tangent angles and the extent
//! accumulator used for toolpath dimensions and soft-limit checks.

pub mod arc;
pub mod bounds;

pub use arc::{bearing, compute_arc, ArcDirection, ArcProperties, MotionDirection, TangentTracker};
pub use bounds::{Axis, BoundingBox, ARC_SAMPLE_STEP_DEG};
