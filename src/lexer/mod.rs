//! Lexical analysis module for the front end.
//!
//! This module contains the scanner that converts VC source text into a
//! stream of tokens for parsing. It handles:
//!
//! - Recognition of keywords, identifiers, literals, separators and operators
//! - Line/column tracking with tab expansion for error reporting
//! - Line and block comments and whitespace
//! - Lexical error reporting (illegal characters, escapes, unterminated tokens)

pub mod lexer;
pub mod source;
pub mod tokens;
