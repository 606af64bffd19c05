//! # GrblTrack
//!
//! Machine-state tracking for GRBL-style CNC controllers:
//! - Decodes status reports, coordinate reports, settings, errors and alarms
//! - Follows the G-code modal state from sent lines and `[GC:...]` reports
//! - Computes arc geometry and tangent bearings for toolpath display
//! - Accumulates toolpath extents and checks them against the machine envelope
//!
//! ## Architecture
//!
//! GrblTrack is organized as a workspace with multiple crates:
//!
//! 1. **grbltrack-core** - Geometry primitives, machine description, errors
//! 2. **grbltrack-visualizer** - Modal parser, arc engine, bounding box
//! 3. **grbltrack-communication** - GRBL protocol decoder and `Session`
//! 4. **grbltrack-settings** - Configuration files
//! 5. **grbltrack** - Re-exports and the capture replay binary

pub mod replay;

pub use grbltrack_communication::firmware;
pub use grbltrack_core::data;
pub use grbltrack_visualizer::{gcode, visualizer};

pub use grbltrack_core::{
    AxisSet, DisplayOptions, Error, OptionalAxis, ParseError, Result, TravelEnvelope, Units,
    XyPoint, XyzPoint,
};

pub use grbltrack_visualizer::{
    bearing, compute_arc, ArcDirection, ArcProperties, Axis, BoundingBox, ModalParser, ModalState,
    MotionDirection, TangentTracker,
};

pub use grbltrack_communication::{
    GrblStatus, LineKind, MessageCatalogs, Session, SessionSnapshot, SharedSession,
};

pub use grbltrack_settings::{Config, DisplaySettings, MachineSettings};

pub use replay::{render_report, replay_file, replay_lines, ReplaySummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, keeping stdout for reports
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
