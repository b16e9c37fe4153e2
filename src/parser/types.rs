use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// `void | boolean | int | float`
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let ty = match parser.current_token_kind() {
        TokenKind::Void => Type::Void,
        TokenKind::Boolean => Type::Boolean,
        TokenKind::Int => Type::Int,
        TokenKind::Float => Type::Float,
        _ => return Err(parser.syntax_error(ErrorImpl::TypeExpected)),
    };
    parser.advance();

    Ok(ty)
}

/// Optional `[ INTLITERAL? ]` after a declared name, turning `base` into an array type.
pub fn parse_declarator_suffix(parser: &mut Parser, base: Type) -> Result<Type, Error> {
    if parser.current_token_kind() != TokenKind::LBracket {
        return Ok(base);
    }
    parser.advance();

    let size = if parser.current_token_kind() == TokenKind::IntLiteral {
        let spelling = parser.current_token().spelling.clone();
        match spelling.parse::<usize>() {
            Ok(size) => {
                parser.advance();
                Some(size)
            }
            Err(_) => return Err(parser.syntax_error(ErrorImpl::InvalidArraySize { spelling })),
        }
    } else {
        None
    };

    parser.expect(TokenKind::RBracket)?;
    Ok(Type::array(base, size))
}
