//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms the scanner's token
//! stream into an arena-allocated AST. It uses precedence climbing for
//! expressions and handles:
//!
//! - Top-level function and variable declarations
//! - Local declarations and statements inside compound statements
//! - Expressions (assignment, binary and unary operators, calls, array access)
//! - Declaration types and array declarators
//!
//! Parsing stops at the first syntax error, which is reported to the
//! diagnostic sink and returned as `Err`.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
