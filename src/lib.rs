#![allow(clippy::module_inception)]

use std::fmt::Display;

use ast::ast::Ast;
use errors::errors::{Diagnostic, ErrorReporter};
use lexer::{lexer::Scanner, source::SourceFile};
use log::info;
use serde::Serialize;
use type_checker::type_checker::{type_check, CheckerOptions};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Half-open range of source positions: `end` is one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span used for nodes with no source text, such as standard library declarations.
    pub fn dummy() -> Self {
        Span::default()
    }

    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})..{}({})",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Runs the whole front end over `source`.
///
/// Returns the decorated AST when parsing succeeded and no diagnostic of any
/// kind was reported. The checker is skipped when parsing fails.
pub fn compile(
    source: &str,
    reporter: &mut dyn ErrorReporter,
    options: CheckerOptions,
) -> Option<Ast> {
    let start = std::time::Instant::now();
    let scanner = Scanner::new(SourceFile::new(source), reporter);
    let mut ast = match parser::parser::parse(scanner) {
        Ok(ast) => ast,
        Err(error) => {
            info!("Parsing aborted by {}: {}", error.get_error_name(), error);
            return None;
        }
    };
    info!("Parsed in {:?}", start.elapsed());

    let check_start = std::time::Instant::now();
    type_check(&mut ast, reporter, options);
    info!("Type checked in {:?}", check_start.elapsed());

    if reporter.num_errors() == 0 {
        Some(ast)
    } else {
        None
    }
}

/// Returns the text of the 1-based `line` in `source`, without its terminator.
pub fn get_line(source: &str, line: u32) -> Option<&str> {
    source
        .split('\n')
        .nth((line as usize).checked_sub(1)?)
        .map(|text| text.trim_end_matches('\r'))
}

/// Formats a diagnostic with the offending line and a caret marker.
///
/// ```text
/// ERROR: 3(9)..3(10): *5: identifier undeclared: y
/// -> test.vc
///   |
/// 3 | x = y;
///   | ----^
/// ```
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) -> String {
    let mut out = format!("{}\n-> {}\n", diagnostic, file);

    let line = diagnostic.position.start.line;
    let Some(line_text) = get_line(source, line) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    let column = visual_width(&line_text[..removed_whitespace])
        .max(diagnostic.position.start.column.saturating_sub(1) as usize);
    let arrows = column - visual_width(&line_text[..removed_whitespace]) + 1;

    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(index, _)| index)
        .unwrap_or(string.len());

    (&string[start..], start)
}

/// Column width of a line prefix, expanding tabs the same way the scanner does.
fn visual_width(prefix: &str) -> usize {
    prefix.chars().fold(0, |column, c| {
        if c == '\t' {
            (column / 8 + 1) * 8
        } else {
            column + 1
        }
    })
}
