//! G-code modal state tracking
//!
//! This module provides:
//! - Modal state of the controller's G-code parser
//! - Line scanner that applies G-code words and `[GC:...]` reports

pub mod parser;

pub use parser::*;
