use crate::{
    ast::expressions::{ExprId, ExprKind, Operator},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        let spelling = parser.current_token().spelling.clone();
        return Err(parser.syntax_error(ErrorImpl::IllegalPrimaryExpression { spelling }));
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than bp, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let Some(&token_bp) = parser.get_bp_lookup().get(&token_kind) else {
            break;
        };
        if token_bp <= bp {
            break;
        }
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_literal_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let token = parser.advance();
    let kind = match token.kind {
        TokenKind::IntLiteral => ExprKind::IntLiteral(token.spelling),
        TokenKind::FloatLiteral => ExprKind::FloatLiteral(token.spelling),
        TokenKind::BooleanLiteral => ExprKind::BooleanLiteral(token.spelling),
        _ => ExprKind::StringLiteral(token.spelling),
    };

    Ok(parser.ast_mut().push_expr(kind, token.span))
}

/// A variable, an array element or a call, depending on the token after the name.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let start = parser.current_token().span.start;
    let ident = parser.expect_ident()?;

    let kind = match parser.current_token_kind() {
        TokenKind::LParen => {
            let args = parse_arg_list(parser)?;
            ExprKind::Call { ident, args }
        }
        TokenKind::LBracket => {
            parser.advance();
            let index = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::RBracket)?;
            ExprKind::ArrayAccess { ident, index }
        }
        _ => ExprKind::Var { ident },
    };

    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_expr(kind, span))
}

fn parse_arg_list(parser: &mut Parser) -> Result<Vec<ExprId>, Error> {
    parser.expect(TokenKind::LParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::RParen {
        args.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::RParen)?;
    Ok(args)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: ExprId,
    bp: BindingPower,
) -> Result<ExprId, Error> {
    let operator_token = parser.advance();
    let right = parse_expr(parser, bp)?;

    let span = parser.ast().expr(left).span.to(&parser.ast().expr(right).span);
    let op = Operator {
        spelling: operator_token.spelling,
        span: operator_token.span,
    };
    Ok(parser.ast_mut().push_expr(ExprKind::Binary { op, left, right }, span))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let operator_token = parser.advance();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = operator_token.span.to(&parser.ast().expr(operand).span);
    let op = Operator {
        spelling: operator_token.spelling,
        span: operator_token.span,
    };
    Ok(parser.ast_mut().push_expr(ExprKind::Unary { op, operand }, span))
}

/// Right-associative: the value is parsed at the lowest binding power.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    target: ExprId,
    _bp: BindingPower,
) -> Result<ExprId, Error> {
    parser.advance();
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = parser.ast().expr(target).span.to(&parser.ast().expr(value).span);
    Ok(parser.ast_mut().push_expr(ExprKind::Assign { target, value }, span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::RParen)?;

    Ok(expr)
}

/// `expr` or `{ expr, ... }`
pub fn parse_initialiser(parser: &mut Parser) -> Result<ExprId, Error> {
    if parser.current_token_kind() != TokenKind::LCurly {
        return parse_expr(parser, BindingPower::Default);
    }

    let start = parser.advance().span.start;
    let mut elements = vec![parse_expr(parser, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        elements.push(parse_expr(parser, BindingPower::Default)?);
    }
    parser.expect(TokenKind::RCurly)?;

    let span = parser.span_from(start);
    Ok(parser.ast_mut().push_expr(ExprKind::InitList { elements }, span))
}

