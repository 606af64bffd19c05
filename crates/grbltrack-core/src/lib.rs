//! # GrblTrack Core
//!
//! Core types, geometry primitives, and errors for GrblTrack.
//! Provides the coordinate types shared by the protocol decoder, the
//! modal parser and the geometry engines.

pub mod data;
pub mod error;
pub mod types;

pub use data::{
    AxisSet, DisplayOptions, OptionalAxis, TravelEnvelope, Units, XyPoint, XyzPoint,
    POSITION_TOLERANCE,
};

pub use error::{parse_value, Error, ParseError, Result};

// Re-export type aliases for convenience
pub use types::{thread_safe, ThreadSafe};
