//! Firmware protocol implementations
//!
//! Supported controllers:
//! - GRBL 1.1 (and the legacy 0.9 banner)

pub mod grbl;

pub use grbl::{GrblStatus, LineKind, Session, SessionSnapshot, SharedSession};
