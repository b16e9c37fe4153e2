use log::trace;

use crate::{
    errors::errors::{Error, ErrorImpl, ErrorReporter},
    Position, Span, MK_SPAN, MK_TOKEN,
};

use super::{
    source::SourceFile,
    tokens::{Token, TokenKind, RESERVED_LOOKUP},
};

const TAB_SIZE: u32 = 8;

/// Hand-written scanner producing one token per `next_token` call.
///
/// The scanner keeps a single current character and peeks further ahead
/// through `SourceFile::inspect_char` only where a lexeme is ambiguous
/// (a leading `.` and a possible exponent). Lexical errors go straight to
/// the reporter; scanning continues except after an unterminated comment.
pub struct Scanner<'r> {
    source: SourceFile,
    current_char: Option<char>,
    current_spelling: String,
    line: u32,
    column: u32,
    /// Set by an unterminated block comment; every later token is EOF.
    halted: bool,
    /// Set once the iterator has handed out EOF.
    finished: bool,
    reporter: &'r mut dyn ErrorReporter,
}

impl<'r> Scanner<'r> {
    pub fn new(mut source: SourceFile, reporter: &'r mut dyn ErrorReporter) -> Self {
        let current_char = source.next_char();

        Scanner {
            source,
            current_char,
            current_spelling: String::new(),
            line: 1,
            column: 1,
            halted: false,
            finished: false,
            reporter,
        }
    }

    pub fn reporter(&mut self) -> &mut (dyn ErrorReporter + 'r) {
        &mut *self.reporter
    }

    /// Returns the next token. After end of input this keeps returning EOF.
    pub fn next_token(&mut self) -> Token {
        if !self.halted {
            self.skip_space_and_comments();
        }

        self.current_spelling.clear();
        let start = self.cursor_position();

        let kind = if self.halted {
            self.current_spelling.push_str(TokenKind::EOF.spell());
            TokenKind::EOF
        } else {
            self.scan_token(start)
        };

        let token = MK_TOKEN!(
            kind,
            std::mem::take(&mut self.current_spelling),
            MK_SPAN!(start, self.cursor_position())
        );
        trace!("{}", token);
        token
    }

    fn cursor_position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn inspect_char(&self, nth: usize) -> Option<char> {
        self.source.inspect_char(nth)
    }

    /// Moves past the current character without recording it.
    fn advance(&mut self) {
        match self.current_char {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some('\t') => {
                self.column = ((self.column - 1) / TAB_SIZE + 1) * TAB_SIZE + 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        self.current_char = self.source.next_char();
    }

    /// Appends the current character to the spelling and moves past it.
    fn accept(&mut self) {
        if let Some(c) = self.current_char {
            self.current_spelling.push(c);
        }
        self.advance();
    }

    fn report(&mut self, error: ErrorImpl, span: Span) {
        Error::new(error, span).report(&mut *self.reporter);
    }

    fn skip_space_and_comments(&mut self) {
        loop {
            match self.current_char {
                Some(' ' | '\t' | '\n' | '\r' | '\x0c') => self.advance(),
                Some('/') if self.inspect_char(1) == Some('/') => {
                    while !matches!(self.current_char, Some('\n') | None) {
                        self.advance();
                    }
                }
                Some('/') if self.inspect_char(1) == Some('*') => {
                    let start = self.cursor_position();
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char {
                            None => {
                                let opening = Position {
                                    line: start.line,
                                    column: start.column + 2,
                                };
                                self.report(
                                    ErrorImpl::UnterminatedComment,
                                    MK_SPAN!(start, opening),
                                );
                                self.halted = true;
                                return;
                            }
                            Some('*') if self.inspect_char(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self, start: Position) -> TokenKind {
        let Some(c) = self.current_char else {
            self.current_spelling.push_str(TokenKind::EOF.spell());
            return TokenKind::EOF;
        };

        match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LCurly),
            '}' => self.single(TokenKind::RCurly),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Mult),
            '/' => self.single(TokenKind::Div),
            '!' => self.one_or_two('=', TokenKind::Not, TokenKind::NotEq),
            '=' => self.one_or_two('=', TokenKind::Eq, TokenKind::EqEq),
            '<' => self.one_or_two('=', TokenKind::Lt, TokenKind::LtEq),
            '>' => self.one_or_two('=', TokenKind::Gt, TokenKind::GtEq),
            '&' => self.pair('&', TokenKind::AndAnd, start),
            '|' => self.pair('|', TokenKind::OrOr, start),
            '"' => self.scan_string(start),
            '.' if matches!(self.inspect_char(1), Some(d) if d.is_ascii_digit()) => {
                self.scan_number()
            }
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),
            _ => {
                self.accept();
                self.illegal_character(start)
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.accept();
        kind
    }

    fn one_or_two(&mut self, second: char, one: TokenKind, two: TokenKind) -> TokenKind {
        self.accept();
        if self.current_char == Some(second) {
            self.accept();
            two
        } else {
            one
        }
    }

    /// `&&` and `||`: a lone `&` or `|` is an illegal character.
    fn pair(&mut self, second: char, kind: TokenKind, start: Position) -> TokenKind {
        self.accept();
        if self.current_char == Some(second) {
            self.accept();
            kind
        } else {
            self.illegal_character(start)
        }
    }

    fn illegal_character(&mut self, start: Position) -> TokenKind {
        let spelling = self.current_spelling.clone();
        self.report(
            ErrorImpl::IllegalCharacter { spelling },
            MK_SPAN!(start, self.cursor_position()),
        );
        TokenKind::Error
    }

    fn scan_identifier(&mut self) -> TokenKind {
        while matches!(self.current_char, Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.accept();
        }

        RESERVED_LOOKUP
            .get(self.current_spelling.as_str())
            .copied()
            .unwrap_or(TokenKind::Id)
    }

    fn accept_digits(&mut self) {
        while matches!(self.current_char, Some(c) if c.is_ascii_digit()) {
            self.accept();
        }
    }

    /// Integer and float literals. A leading `.` is only dispatched here when a digit follows it.
    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::IntLiteral;

        self.accept_digits();

        if self.current_char == Some('.') {
            self.accept();
            self.accept_digits();
            kind = TokenKind::FloatLiteral;
        }

        if matches!(self.current_char, Some('e' | 'E')) && self.exponent_follows() {
            self.accept();
            if matches!(self.current_char, Some('+' | '-')) {
                self.accept();
            }
            self.accept_digits();
            kind = TokenKind::FloatLiteral;
        }

        kind
    }

    /// Whether the `e`/`E` under the cursor starts an exponent: a digit or a signed digit follows.
    fn exponent_follows(&self) -> bool {
        match self.inspect_char(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => matches!(self.inspect_char(2), Some(c) if c.is_ascii_digit()),
            _ => false,
        }
    }

    fn scan_string(&mut self, start: Position) -> TokenKind {
        // The quotes are not part of the spelling.
        self.advance();

        loop {
            match self.current_char {
                Some('"') => {
                    self.advance();
                    break;
                }
                None | Some('\n') => {
                    let spelling = self.current_spelling.clone();
                    self.report(
                        ErrorImpl::UnterminatedString { spelling },
                        MK_SPAN!(start, self.cursor_position()),
                    );
                    break;
                }
                Some('\\') => self.scan_escape(),
                Some(_) => self.accept(),
            }
        }

        TokenKind::StringLiteral
    }

    fn scan_escape(&mut self) {
        let escaped = match self.inspect_char(1) {
            Some('b') => Some('\u{8}'),
            Some('f') => Some('\u{c}'),
            Some('n') => Some('\n'),
            Some('r') => Some('\r'),
            Some('t') => Some('\t'),
            Some('"') => Some('"'),
            Some('\'') => Some('\''),
            Some('\\') => Some('\\'),
            _ => None,
        };

        match (escaped, self.inspect_char(1)) {
            (Some(c), _) => {
                self.advance();
                self.advance();
                self.current_spelling.push(c);
            }
            (None, Some(next)) if next != '\n' => {
                let start = self.cursor_position();
                let end = Position {
                    line: start.line,
                    column: start.column + 2,
                };
                self.report(
                    ErrorImpl::IllegalEscape {
                        escape: format!("\\{}", next),
                    },
                    MK_SPAN!(start, end),
                );
                // The backslash is kept literally; the next character is scanned normally.
                self.accept();
            }
            (None, _) => self.accept(),
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields every token up to and including the first EOF.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if token.kind == TokenKind::EOF {
            self.finished = true;
        }
        Some(token)
    }
}

/// Scans `source` to completion, reporting lexical errors into `reporter`.
pub fn tokenize(source: &str, reporter: &mut dyn ErrorReporter) -> Vec<Token> {
    Scanner::new(SourceFile::new(source), reporter).collect()
}
