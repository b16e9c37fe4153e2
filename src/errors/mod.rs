//! Error types and error reporting for the front end.
//!
//! This module defines the diagnostics produced by every phase:
//!
//! - Lexical errors (illegal characters, bad escapes, unterminated tokens)
//! - Syntax errors (at most one per compilation)
//! - The numbered semantic error catalog (`*0` to `*31`)
//! - The `ErrorReporter` sink trait and the collecting `Diagnostics` sink

pub mod errors;
