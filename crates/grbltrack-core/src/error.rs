//! Error handling for GrblTrack
//!
//! Provides the error types used at the fallible seams of the tracker:
//! - Parse errors (numeric words, coordinate reports, status fields)
//! - I/O errors from reading capture files
//!
//! Decoding controller output never fails hard. Parse errors are produced by
//! explicit fallible helpers and discarded by the callers that choose to be
//! lenient, so the leniency stays visible and testable.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Parse error type
///
/// Represents a token or field that could not be turned into a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Numeric token could not be parsed or was not finite
    #[error("Malformed number '{token}'")]
    MalformedNumber {
        /// The offending token.
        token: String,
    },

    /// Word letter was not followed by a value
    #[error("Missing value for word '{letter}'")]
    MissingValue {
        /// The word letter without a value.
        letter: char,
    },

    /// Coordinate report id is not one the controller is known to send
    #[error("Unknown coordinate report id: {id}")]
    UnknownCoordinateId {
        /// The rejected id.
        id: String,
    },

    /// A report line did not have the expected shape
    #[error("Malformed report: {reason}")]
    MalformedReport {
        /// Why the report was rejected.
        reason: String,
    },
}

/// Main error type for GrblTrack
///
/// Raised where a host asks for strict handling, such as replaying a
/// capture file that must decode cleanly.
#[derive(Error, Debug)]
pub enum Error {
    /// Parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Parse a numeric word argument or report field.
///
/// Accepts surrounding whitespace and an optional sign. Rejects empty tokens
/// and non-finite results (`inf`, `NaN`), which the controller never sends.
pub fn parse_value(token: &str) -> std::result::Result<f64, ParseError> {
    let trimmed = token.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::MalformedNumber {
            token: trimmed.to_string(),
        }),
    }
}
