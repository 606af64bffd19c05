//! # GrblTrack Communication
//!
//! Protocol decoding for GrblTrack.
//! Turns the lines a GRBL controller sends into session state: status,
//! positions, coordinate and settings tables, messages and modal state.
//! Transport is left to the host; lines arrive already framed.

pub mod firmware;

pub use firmware::grbl::{
    decode_status, is_error_caused_by_program, is_error_line_caused_by_program,
    realtime_command_label, status_text, CatalogError, GrblStatus, LineKind, MessageCatalogs,
    MessageTable, Session, SessionSnapshot, SharedSession, StatusParser, StatusReport,
};
