use lazy_static::lazy_static;
use serde::Serialize;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    /// Whole-lexeme lookup for keywords and boolean literals.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("boolean", TokenKind::Boolean);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("else", TokenKind::Else);
        map.insert("float", TokenKind::Float);
        map.insert("for", TokenKind::For);
        map.insert("if", TokenKind::If);
        map.insert("int", TokenKind::Int);
        map.insert("return", TokenKind::Return);
        map.insert("void", TokenKind::Void);
        map.insert("while", TokenKind::While);
        map.insert("true", TokenKind::BooleanLiteral);
        map.insert("false", TokenKind::BooleanLiteral);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum TokenKind {
    // Keywords
    Boolean,
    Break,
    Continue,
    Else,
    Float,
    For,
    If,
    Int,
    Return,
    Void,
    While,

    // Operators
    Plus,
    Minus,
    Mult,
    Div,
    Not,
    NotEq,
    Eq,
    EqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,

    // Separators
    LCurly,
    RCurly,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    Id,

    IntLiteral,
    FloatLiteral,
    BooleanLiteral,
    StringLiteral,

    Error,
    EOF,
}

impl TokenKind {
    /// The fixed spelling of the token kind, as quoted in syntax errors.
    pub fn spell(&self) -> &'static str {
        match self {
            TokenKind::Boolean => "boolean",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::Float => "float",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Int => "int",
            TokenKind::Return => "return",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Mult => "*",
            TokenKind::Div => "/",
            TokenKind::Not => "!",
            TokenKind::NotEq => "!=",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Id => "<id>",
            TokenKind::IntLiteral => "<int-literal>",
            TokenKind::FloatLiteral => "<float-literal>",
            TokenKind::BooleanLiteral => "<boolean-literal>",
            TokenKind::StringLiteral => "<string-literal>",
            TokenKind::Error => "<error>",
            TokenKind::EOF => "$",
        }
    }

    /// Whether the token starts a type in a declaration.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Void | TokenKind::Boolean | TokenKind::Int | TokenKind::Float
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spell())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub spelling: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Kind = {:?}, spelling = \"{}\", position = {}",
            self.kind, self.spelling, self.span
        )
    }
}
