//! GRBL protocol decoding
//!
//! Decodes the text a GRBL 1.1 controller sends (status reports, coordinate
//! and parser-state reports, settings, errors and alarms) into a [`Session`].

pub mod error_decoder;
pub mod realtime;
pub mod session;
pub mod status;
pub mod status_parser;

pub use error_decoder::{
    is_error_caused_by_program, is_error_line_caused_by_program, CatalogError, MessageCatalogs,
    MessageTable, ARC_PRECISION_HINT,
};
pub use realtime::realtime_command_label;
pub use session::{LineKind, Session, SessionSnapshot, SharedSession, COORDINATE_IDS};
pub use status::{decode_status, status_text, GrblStatus};
pub use status_parser::{
    parse_axis_values, point_from_values, BufferState, OverrideState, StatusParser, StatusReport,
};
