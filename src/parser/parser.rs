//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program-level parsing
//! functions. Expressions are parsed by precedence climbing with NUD/LED
//! handlers; statements are dispatched through a token-keyed handler table.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Tokens are pulled from the scanner on demand with one token of lookahead.
//! The first syntax error is reported and then propagated as `Err`, which
//! aborts the whole parse.

use std::collections::HashMap;

use log::trace;

use crate::{
    ast::{
        ast::Ast,
        expressions::{ExprId, Ident},
        statements::{DeclId, DeclKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Scanner,
        tokens::{Token, TokenKind},
    },
    Position, Span, MK_SPAN,
};

use super::{
    expr::parse_initialiser,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_compound_stmt,
    types::{parse_declarator_suffix, parse_type},
};

/// The main parser structure that maintains parsing state.
///
/// This struct owns the scanner and the AST under construction, and keeps
/// the lookup tables for parsing statements and expressions.
pub struct Parser<'r> {
    scanner: Scanner<'r>,
    current_token: Token,
    /// End of the most recently consumed token, used to close node spans
    previous_end: Position,
    ast: Ast,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup<'r>,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup<'r>,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup<'r>,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl<'r> Parser<'r> {
    /// Creates a new Parser and reads the first token.
    pub fn new(mut scanner: Scanner<'r>) -> Self {
        let current_token = scanner.next_token();

        Parser {
            scanner,
            current_token,
            previous_end: Position { line: 1, column: 1 },
            ast: Ast::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let next = self.scanner.next_token();
        let previous = std::mem::replace(&mut self.current_token, next);
        self.previous_end = previous.span.end;
        previous
    }

    /// Expects a token of the specified kind.
    ///
    /// Reports `"%" expected here` at the current token when it does not match.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(ErrorImpl::TokenExpected {
                expected: expected_kind,
            }))
        }
    }

    /// Expects an identifier and returns it as an unbound `Ident`.
    pub fn expect_ident(&mut self) -> Result<Ident, Error> {
        if self.current_token_kind() == TokenKind::Id {
            let token = self.advance();
            Ok(Ident::new(token.spelling, token.span))
        } else {
            Err(self.syntax_error(ErrorImpl::IdentifierExpected))
        }
    }

    /// Reports `error` at the current token and returns it for propagation.
    pub fn syntax_error(&mut self, error: ErrorImpl) -> Error {
        debug_assert!(error.is_syntax_error(), "not a syntax error: {}", error);
        let error = Error::new(error, self.current_token.span);
        error.report(self.scanner.reporter());
        error
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        MK_SPAN!(start, self.previous_end)
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn ast_mut(&mut self) -> &mut Ast {
        &mut self.ast
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup<'r> {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup<'r> {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup<'r> {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler<'r>) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler<'r>) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler<'r>) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses a VC program into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses top-level declarations until
/// EOF. The first syntax error is returned after it has been reported.
pub fn parse(scanner: Scanner<'_>) -> Result<Ast, Error> {
    let mut parser = Parser::new(scanner);
    create_token_lookups(&mut parser);

    let start = parser.current_token().span.start;
    let mut program = vec![];

    while parser.current_token_kind() != TokenKind::EOF {
        program.extend(parse_top_level_decl(&mut parser)?);
    }

    let span = MK_SPAN!(start, parser.current_token().span.end);
    parser.ast.set_program(program, span);
    trace!("Parsed {} top-level declarations", parser.ast.program.len());

    Ok(parser.ast)
}

/// `type identifier` followed by either a function or a variable declaration list.
fn parse_top_level_decl(parser: &mut Parser) -> Result<Vec<DeclId>, Error> {
    let start = parser.current_token().span.start;
    let ty = parse_type(parser)?;
    let ident = parser.expect_ident()?;

    if parser.current_token_kind() == TokenKind::LParen {
        Ok(vec![parse_func_decl(parser, start, ty, ident)?])
    } else {
        parse_var_decl(parser, start, ty, ident, true)
    }
}

fn parse_func_decl(
    parser: &mut Parser,
    start: Position,
    return_type: Type,
    ident: Ident,
) -> Result<DeclId, Error> {
    let params = parse_para_list(parser)?;
    let body = parse_compound_stmt(parser)?;

    let kind = DeclKind::Func {
        params,
        body: Some(body),
        has_return: false,
    };
    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_decl(kind, ident, return_type, span))
}

fn parse_para_list(parser: &mut Parser) -> Result<Vec<DeclId>, Error> {
    parser.expect(TokenKind::LParen)?;

    let mut params = vec![];
    if parser.current_token_kind() != TokenKind::RParen {
        params.push(parse_para_decl(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            params.push(parse_para_decl(parser)?);
        }
    }

    parser.expect(TokenKind::RParen)?;
    Ok(params)
}

fn parse_para_decl(parser: &mut Parser) -> Result<DeclId, Error> {
    let start = parser.current_token().span.start;
    let ty = parse_type(parser)?;
    let ident = parser.expect_ident()?;
    let ty = parse_declarator_suffix(parser, ty)?;

    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_decl(DeclKind::Param, ident, ty, span))
}

/// Parses the rest of a variable declaration list after its type and first name.
///
/// Every declarator gets its own declaration sharing the base type.
pub fn parse_var_decl(
    parser: &mut Parser,
    start: Position,
    base_type: Type,
    first: Ident,
    global: bool,
) -> Result<Vec<DeclId>, Error> {
    let mut decls = vec![parse_init_declarator(parser, start, &base_type, first, global)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        let start = parser.current_token().span.start;
        let ident = parser.expect_ident()?;
        decls.push(parse_init_declarator(parser, start, &base_type, ident, global)?);
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(decls)
}

fn parse_init_declarator(
    parser: &mut Parser,
    start: Position,
    base_type: &Type,
    ident: Ident,
    global: bool,
) -> Result<DeclId, Error> {
    let ty = parse_declarator_suffix(parser, base_type.clone())?;

    let init: Option<ExprId> = if parser.current_token_kind() == TokenKind::Eq {
        parser.advance();
        Some(parse_initialiser(parser)?)
    } else {
        None
    };

    let kind = if global {
        DeclKind::GlobalVar { init }
    } else {
        DeclKind::LocalVar { init }
    };
    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_decl(kind, ident, ty, span))
}

