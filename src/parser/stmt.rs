use crate::{
    ast::{expressions::ExprId, statements::{StmtId, StmtKind}},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Position,
};

use super::{
    parser::{parse_var_decl, Parser},
    types::parse_type,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let start = parser.current_token().span.start;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    finish_stmt(parser, start, StmtKind::Expr { expr })
}

fn finish_stmt(parser: &mut Parser, start: Position, kind: StmtKind) -> Result<StmtId, Error> {
    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_stmt(kind, span))
}

/// `{ local-var-decl* stmt* }`
pub fn parse_compound_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.expect(TokenKind::LCurly)?.span.start;

    let mut decls = Vec::new();
    while parser.current_token_kind().is_type() {
        let decl_start = parser.current_token().span.start;
        let ty = parse_type(parser)?;
        let ident = parser.expect_ident()?;
        decls.extend(parse_var_decl(parser, decl_start, ty, ident, false)?);
    }

    let mut stmts = Vec::new();
    while parser.current_token_kind() != TokenKind::RCurly {
        stmts.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::RCurly)?;

    finish_stmt(parser, start, StmtKind::Compound { decls, stmts })
}

fn parse_condition(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.expect(TokenKind::LParen)?;
    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::RParen)?;
    Ok(cond)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    let cond = parse_condition(parser)?;
    let then_branch = parse_stmt(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    finish_stmt(
        parser,
        start,
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        },
    )
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    let cond = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    finish_stmt(parser, start, StmtKind::While { cond, body })
}

/// Parses an optional expression terminated by `terminator`, consuming the terminator.
fn parse_optional_expr(
    parser: &mut Parser,
    terminator: TokenKind,
) -> Result<Option<ExprId>, Error> {
    let expr = if parser.current_token_kind() != terminator {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(terminator)?;
    Ok(expr)
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::LParen)?;
    let init = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let cond = parse_optional_expr(parser, TokenKind::Semicolon)?;
    let update = parse_optional_expr(parser, TokenKind::RParen)?;
    let body = parse_stmt(parser)?;

    finish_stmt(
        parser,
        start,
        StmtKind::For {
            init,
            cond,
            update,
            body,
        },
    )
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::Semicolon)?;

    finish_stmt(parser, start, StmtKind::Break)
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::Semicolon)?;

    finish_stmt(parser, start, StmtKind::Continue)
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;
    let value = parse_optional_expr(parser, TokenKind::Semicolon)?;

    finish_stmt(parser, start, StmtKind::Return { value })
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start;

    finish_stmt(parser, start, StmtKind::Empty)
}
