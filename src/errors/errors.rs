use std::fmt::Display;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::{ast::types::Type, lexer::tokens::TokenKind, Span};

/// A positioned error: the catalog entry plus the span it is reported at.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Span) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Span {
        &self.position
    }

    /// Forwards this error to a diagnostic sink as a `(template, token, span)` triple.
    pub fn report(&self, reporter: &mut dyn ErrorReporter) {
        debug!("{}: {}", self.position, self.internal_error);
        reporter.report_error(
            self.internal_error.template(),
            &self.internal_error.quoted(),
            &self.position,
        );
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::IllegalEscape { .. } => "IllegalEscape",
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::TokenExpected { .. } => "TokenExpected",
            ErrorImpl::IdentifierExpected => "IdentifierExpected",
            ErrorImpl::TypeExpected => "TypeExpected",
            ErrorImpl::IllegalPrimaryExpression { .. } => "IllegalPrimaryExpression",
            ErrorImpl::InvalidArraySize { .. } => "InvalidArraySize",
            ErrorImpl::MainMissing => "MainMissing",
            ErrorImpl::MainNotInt => "MainNotInt",
            ErrorImpl::Redeclared { .. } => "Redeclared",
            ErrorImpl::DeclaredVoid { .. } => "DeclaredVoid",
            ErrorImpl::DeclaredVoidArray { .. } => "DeclaredVoidArray",
            ErrorImpl::Undeclared { .. } => "Undeclared",
            ErrorImpl::IncompatibleAssignment => "IncompatibleAssignment",
            ErrorImpl::InvalidLvalue => "InvalidLvalue",
            ErrorImpl::IncompatibleReturn => "IncompatibleReturn",
            ErrorImpl::IncompatibleBinaryOperand { .. } => "IncompatibleBinaryOperand",
            ErrorImpl::IncompatibleUnaryOperand { .. } => "IncompatibleUnaryOperand",
            ErrorImpl::NotScalar { .. } => "NotScalar",
            ErrorImpl::NotArray { .. } => "NotArray",
            ErrorImpl::WrongInitialiserElement => "WrongInitialiserElement",
            ErrorImpl::ArrayInitialiserForScalar => "ArrayInitialiserForScalar",
            ErrorImpl::ScalarInitialiserForArray => "ScalarInitialiserForArray",
            ErrorImpl::ExcessElements => "ExcessElements",
            ErrorImpl::SubscriptNotInteger => "SubscriptNotInteger",
            ErrorImpl::ArraySizeMissing => "ArraySizeMissing",
            ErrorImpl::NotFunction => "NotFunction",
            ErrorImpl::IfConditionNotBoolean { .. } => "IfConditionNotBoolean",
            ErrorImpl::ForConditionNotBoolean { .. } => "ForConditionNotBoolean",
            ErrorImpl::WhileConditionNotBoolean { .. } => "WhileConditionNotBoolean",
            ErrorImpl::BreakOutsideLoop => "BreakOutsideLoop",
            ErrorImpl::ContinueOutsideLoop => "ContinueOutsideLoop",
            ErrorImpl::TooManyArguments => "TooManyArguments",
            ErrorImpl::TooFewArguments => "TooFewArguments",
            ErrorImpl::WrongArgumentType => "WrongArgumentType",
            ErrorImpl::MainCalled => "MainCalled",
            ErrorImpl::StatementNotReached => "StatementNotReached",
            ErrorImpl::MissingReturn => "MissingReturn",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

/// Every diagnostic the front end can produce.
///
/// Semantic variants carry their catalog number as a `*N:` prefix. The
/// wording is relied upon by external test fixtures, so the `#[error]`
/// strings and the `template()` strings must stay in step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("{spelling}: illegal character")]
    IllegalCharacter { spelling: String },
    #[error("{escape}: illegal escape character")]
    IllegalEscape { escape: String },
    #[error("{spelling}: unterminated string")]
    UnterminatedString { spelling: String },
    #[error("unterminated comment")]
    UnterminatedComment,

    // Syntax
    #[error("\"{expected}\" expected here")]
    TokenExpected { expected: TokenKind },
    #[error("identifier expected here")]
    IdentifierExpected,
    #[error("type expected here")]
    TypeExpected,
    #[error("illegal primary expression: {spelling}")]
    IllegalPrimaryExpression { spelling: String },
    #[error("{spelling}: invalid array size")]
    InvalidArraySize { spelling: String },

    // Semantic
    #[error("*0: main function is missing")]
    MainMissing,
    #[error("*1: return type of main is not int")]
    MainNotInt,
    #[error("*2: identifier redeclared: {name}")]
    Redeclared { name: String },
    #[error("*3: identifier declared void: {name}")]
    DeclaredVoid { name: String },
    #[error("*4: identifier declared void[]: {name}")]
    DeclaredVoidArray { name: String },
    #[error("*5: identifier undeclared: {name}")]
    Undeclared { name: String },
    #[error("*6: incompatible type for =")]
    IncompatibleAssignment,
    #[error("*7: invalid lvalue in assignment")]
    InvalidLvalue,
    #[error("*8: incompatible type for return")]
    IncompatibleReturn,
    #[error("*9: incompatible type for this binary operator: {operator}")]
    IncompatibleBinaryOperand { operator: String },
    #[error("*10: incompatible type for this unary operator: {operator}")]
    IncompatibleUnaryOperand { operator: String },
    #[error("*11: attempt to use an array/function as a scalar: {name}")]
    NotScalar { name: String },
    #[error("*12: attempt to use a scalar/function as an array: {name}")]
    NotArray { name: String },
    #[error("*13: wrong type for element in array initialiser")]
    WrongInitialiserElement,
    #[error("*14: invalid initialiser: array initialiser for scalar")]
    ArrayInitialiserForScalar,
    #[error("*15: invalid initialiser: scalar initialiser for array")]
    ScalarInitialiserForArray,
    #[error("*16: excess elements in array initialiser")]
    ExcessElements,
    #[error("*17: array subscript is not an integer")]
    SubscriptNotInteger,
    #[error("*18: array size missing")]
    ArraySizeMissing,
    #[error("*19: attempt to reference a scalar/array as a function")]
    NotFunction,
    #[error("*20: if conditional is not boolean (found: {found})")]
    IfConditionNotBoolean { found: Type },
    #[error("*21: for conditional is not boolean (found: {found})")]
    ForConditionNotBoolean { found: Type },
    #[error("*22: while conditional is not boolean (found: {found})")]
    WhileConditionNotBoolean { found: Type },
    #[error("*23: break must be in a while/for")]
    BreakOutsideLoop,
    #[error("*24: continue must be in a while/for")]
    ContinueOutsideLoop,
    #[error("*25: too many actual parameters")]
    TooManyArguments,
    #[error("*26: too few actual parameters")]
    TooFewArguments,
    #[error("*27: wrong type for actual parameter")]
    WrongArgumentType,
    #[error("*29: misc 2: main called")]
    MainCalled,
    #[error("*30: statement(s) not reached")]
    StatementNotReached,
    #[error("*31: missing return statement")]
    MissingReturn,
}

impl ErrorImpl {
    /// The message template handed to the sink; `%` marks where `quoted()` goes.
    pub fn template(&self) -> &'static str {
        match self {
            ErrorImpl::IllegalCharacter { .. } => "%: illegal character",
            ErrorImpl::IllegalEscape { .. } => "%: illegal escape character",
            ErrorImpl::UnterminatedString { .. } => "%: unterminated string",
            ErrorImpl::UnterminatedComment => "unterminated comment",
            ErrorImpl::TokenExpected { .. } => "\"%\" expected here",
            ErrorImpl::IdentifierExpected => "identifier expected here",
            ErrorImpl::TypeExpected => "type expected here",
            ErrorImpl::IllegalPrimaryExpression { .. } => "illegal primary expression: %",
            ErrorImpl::InvalidArraySize { .. } => "%: invalid array size",
            ErrorImpl::MainMissing => "*0: main function is missing",
            ErrorImpl::MainNotInt => "*1: return type of main is not int",
            ErrorImpl::Redeclared { .. } => "*2: identifier redeclared: %",
            ErrorImpl::DeclaredVoid { .. } => "*3: identifier declared void: %",
            ErrorImpl::DeclaredVoidArray { .. } => "*4: identifier declared void[]: %",
            ErrorImpl::Undeclared { .. } => "*5: identifier undeclared: %",
            ErrorImpl::IncompatibleAssignment => "*6: incompatible type for =",
            ErrorImpl::InvalidLvalue => "*7: invalid lvalue in assignment",
            ErrorImpl::IncompatibleReturn => "*8: incompatible type for return",
            ErrorImpl::IncompatibleBinaryOperand { .. } => {
                "*9: incompatible type for this binary operator: %"
            }
            ErrorImpl::IncompatibleUnaryOperand { .. } => {
                "*10: incompatible type for this unary operator: %"
            }
            ErrorImpl::NotScalar { .. } => "*11: attempt to use an array/function as a scalar: %",
            ErrorImpl::NotArray { .. } => "*12: attempt to use a scalar/function as an array: %",
            ErrorImpl::WrongInitialiserElement => {
                "*13: wrong type for element in array initialiser"
            }
            ErrorImpl::ArrayInitialiserForScalar => {
                "*14: invalid initialiser: array initialiser for scalar"
            }
            ErrorImpl::ScalarInitialiserForArray => {
                "*15: invalid initialiser: scalar initialiser for array"
            }
            ErrorImpl::ExcessElements => "*16: excess elements in array initialiser",
            ErrorImpl::SubscriptNotInteger => "*17: array subscript is not an integer",
            ErrorImpl::ArraySizeMissing => "*18: array size missing",
            ErrorImpl::NotFunction => "*19: attempt to reference a scalar/array as a function",
            ErrorImpl::IfConditionNotBoolean { .. } => "*20: if conditional is not boolean %",
            ErrorImpl::ForConditionNotBoolean { .. } => "*21: for conditional is not boolean %",
            ErrorImpl::WhileConditionNotBoolean { .. } => "*22: while conditional is not boolean %",
            ErrorImpl::BreakOutsideLoop => "*23: break must be in a while/for",
            ErrorImpl::ContinueOutsideLoop => "*24: continue must be in a while/for",
            ErrorImpl::TooManyArguments => "*25: too many actual parameters",
            ErrorImpl::TooFewArguments => "*26: too few actual parameters",
            ErrorImpl::WrongArgumentType => "*27: wrong type for actual parameter",
            ErrorImpl::MainCalled => "*29: misc 2: main called",
            ErrorImpl::StatementNotReached => "*30: statement(s) not reached",
            ErrorImpl::MissingReturn => "*31: missing return statement",
        }
    }

    /// The token substituted for `%` in `template()`; empty when the template has none.
    pub fn quoted(&self) -> String {
        match self {
            ErrorImpl::IllegalCharacter { spelling }
            | ErrorImpl::UnterminatedString { spelling }
            | ErrorImpl::IllegalPrimaryExpression { spelling }
            | ErrorImpl::InvalidArraySize { spelling } => spelling.clone(),
            ErrorImpl::IllegalEscape { escape } => escape.clone(),
            ErrorImpl::TokenExpected { expected } => expected.to_string(),
            ErrorImpl::Redeclared { name }
            | ErrorImpl::DeclaredVoid { name }
            | ErrorImpl::DeclaredVoidArray { name }
            | ErrorImpl::Undeclared { name }
            | ErrorImpl::NotScalar { name }
            | ErrorImpl::NotArray { name } => name.clone(),
            ErrorImpl::IncompatibleBinaryOperand { operator }
            | ErrorImpl::IncompatibleUnaryOperand { operator } => operator.clone(),
            ErrorImpl::IfConditionNotBoolean { found }
            | ErrorImpl::ForConditionNotBoolean { found }
            | ErrorImpl::WhileConditionNotBoolean { found } => format!("(found: {})", found),
            _ => String::new(),
        }
    }

    /// Catalog number for semantic errors, `None` for lexical and syntax errors.
    pub fn code(&self) -> Option<u8> {
        parse_code(self.template())
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            ErrorImpl::TokenExpected { .. }
                | ErrorImpl::IdentifierExpected
                | ErrorImpl::TypeExpected
                | ErrorImpl::IllegalPrimaryExpression { .. }
                | ErrorImpl::InvalidArraySize { .. }
        )
    }
}

/// Extracts `N` from a message starting with `*N:`.
fn parse_code(message: &str) -> Option<u8> {
    let rest = message.strip_prefix('*')?;
    let (number, _) = rest.split_once(':')?;
    number.parse().ok()
}

/// Replaces the first `%` in `template` with `token_quoted`.
pub fn substitute(template: &str, token_quoted: &str) -> String {
    template.replacen('%', token_quoted, 1)
}

/// The diagnostic sink the scanner, parser and checker report into.
pub trait ErrorReporter {
    fn report_error(&mut self, message_template: &str, token_quoted: &str, position: &Span);

    fn num_errors(&self) -> usize;
}

/// A reported, fully formatted diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub position: Span,
}

impl Diagnostic {
    pub fn code(&self) -> Option<u8> {
        parse_code(&self.message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR: {}: {}", self.position, self.message)
    }
}

/// Default sink: keeps every diagnostic in report order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Catalog numbers of the semantic diagnostics, in report order.
    pub fn codes(&self) -> Vec<u8> {
        self.entries.iter().filter_map(Diagnostic::code).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ErrorReporter for Diagnostics {
    fn report_error(&mut self, message_template: &str, token_quoted: &str, position: &Span) {
        self.entries.push(Diagnostic {
            message: substitute(message_template, token_quoted),
            position: *position,
        });
    }

    fn num_errors(&self) -> usize {
        self.entries.len()
    }
}
