use std::collections::HashMap;

use crate::{
    ast::{expressions::ExprId, statements::StmtId},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

pub type StmtHandler<'r> = fn(&mut Parser<'r>) -> Result<StmtId, Error>;
pub type NUDHandler<'r> = fn(&mut Parser<'r>) -> Result<ExprId, Error>;
pub type LEDHandler<'r> = fn(&mut Parser<'r>, ExprId, BindingPower) -> Result<ExprId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Eq, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    parser.led(TokenKind::OrOr, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::AndAnd, BindingPower::LogicalAnd, parse_binary_expr);

    // Equality and relational
    parser.led(TokenKind::EqEq, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::NotEq, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Lt, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LtEq, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Gt, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GtEq, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Minus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Mult, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Div, BindingPower::Multiplicative, parse_binary_expr);

    // Prefix operators
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Minus, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);

    // Literals, identifiers and grouping
    parser.nud(TokenKind::IntLiteral, parse_literal_expr);
    parser.nud(TokenKind::FloatLiteral, parse_literal_expr);
    parser.nud(TokenKind::BooleanLiteral, parse_literal_expr);
    parser.nud(TokenKind::StringLiteral, parse_literal_expr);
    parser.nud(TokenKind::Id, parse_identifier_expr);
    parser.nud(TokenKind::LParen, parse_grouping_expr);

    // Statements
    parser.stmt(TokenKind::LCurly, parse_compound_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Break, parse_break_stmt);
    parser.stmt(TokenKind::Continue, parse_continue_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Semicolon, parse_empty_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup<'r> = HashMap<TokenKind, StmtHandler<'r>>;
pub type NUDLookup<'r> = HashMap<TokenKind, NUDHandler<'r>>;
pub type LEDLookup<'r> = HashMap<TokenKind, LEDHandler<'r>>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
