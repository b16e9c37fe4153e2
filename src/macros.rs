//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_SPAN!` - Creates a Span from two positions

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$spelling` - The token's spelling
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntLiteral, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $spelling:expr, $span:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            spelling: $spelling,
            span: $span,
        }
    };
}

/// Creates a Span covering `$start` up to (not including) `$end`.
#[macro_export]
macro_rules! MK_SPAN {
    ($start:expr, $end:expr) => {
        $crate::Span {
            start: $start,
            end: $end,
        }
    };
}
