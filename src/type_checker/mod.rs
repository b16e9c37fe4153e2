//! Semantic analysis for VC programs.
//!
//! The checker walks the parsed AST once and decorates it in place:
//!
//! - Binds every identifier use to its declaration through a scoped symbol table
//! - Assigns a type to every expression, with `Error` absorbing follow-up failures
//! - Inserts implicit int-to-float conversions and fills in inferred array sizes
//! - Reports the numbered semantic diagnostics
//!
//! The standard library functions are installed into the global scope of
//! each compilation before the program is visited.

pub mod environment;
pub mod expr;
pub mod symbol_table;
pub mod type_checker;
