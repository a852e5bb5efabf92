//! Tokenizer for twig source code
//!
//! [`Tokenizer`] is pull-based: each call to [`Tokenizer::next_token`] scans
//! exactly one [`Token`] out of the borrowed source. Tokens never copy text;
//! their lexeme is a slice of the source (or, for [`TokenKind::Error`], a static
//! diagnostic message).
//!
//! The source ends at its last byte or at the first NUL byte, whichever comes
//! first. Once the end is reached every further call returns [`TokenKind::Eof`].

use log::trace;
use std::fmt;

/// Every token kind the tokenizer produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    // Literals and names
    Number,
    String,
    Identifier,

    // Keywords
    Var,
    If,
    Else,
    While,
    Print,

    // Operators
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Bang,    // !
    BangEq,  // !=
    Eq,      // =
    EqEq,    // ==
    Lt,      // <
    Gt,      // >
    LtEq,    // <=
    GtEq,    // >=
    AndAnd,  // &&
    OrOr,    // ||

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;

    Error,
}

impl TokenKind {
    /// Source spelling for fixed tokens, `None` for literals, names, EOF and errors.
    pub fn symbol(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Print => "print",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::BangEq => "!=",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Eof
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Identifier
            | TokenKind::Error => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Error => write!(f, "invalid token"),
            other => match other.symbol() {
                Some(text) => write!(f, "'{}'", text),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

/// Fixed keyword table, matched by exact length and content
const KEYWORDS: [(&str, TokenKind); 5] = [
    ("var", TokenKind::Var),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("print", TokenKind::Print),
];

pub const UNEXPECTED_CHARACTER: &str = "Unexpected character";
pub const UNTERMINATED_STRING: &str = "Unterminated string";

/// One lexical token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Scanned text, or the diagnostic message for [`TokenKind::Error`]
    pub lexeme: &'src str,
    /// Byte offset of the scanned text in the source
    pub start: usize,
    pub line: usize,
}

impl Token<'_> {
    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Number => write!(f, "number {}", self.lexeme),
            TokenKind::String => write!(f, "string {}", self.lexeme),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::Error => write!(f, "error: {}", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Pull tokenizer over a borrowed source buffer
pub struct Tokenizer<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Current line of the scan cursor.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let token = self.scan_token();
        trace!("token {:?} {:?} (line {})", token.kind, token.lexeme, token.line);
        token
    }

    fn scan_token(&mut self) -> Token<'src> {
        loop {
            self.start = self.current;
            if self.peek() == b'\0' {
                return self.make_token(TokenKind::Eof);
            }

            let ch = self.advance();
            match ch {
                b' ' | b'\t' | b'\r' => continue,
                b'\n' => {
                    self.line += 1;
                    continue;
                }
                // Only the two marker characters are skipped
                b'/' if self.peek() == b'/' => {
                    self.current += 1;
                    continue;
                }
                _ => {}
            }

            return match ch {
                b'(' => self.make_token(TokenKind::LParen),
                b')' => self.make_token(TokenKind::RParen),
                b'{' => self.make_token(TokenKind::LBrace),
                b'}' => self.make_token(TokenKind::RBrace),
                b';' => self.make_token(TokenKind::Semicolon),
                b'+' => self.make_token(TokenKind::Plus),
                b'-' => self.make_token(TokenKind::Minus),
                b'*' => self.make_token(TokenKind::Star),
                b'/' => self.make_token(TokenKind::Slash),
                b'%' => self.make_token(TokenKind::Percent),
                b'=' => self.either(b'=', TokenKind::EqEq, TokenKind::Eq),
                b'!' => self.either(b'=', TokenKind::BangEq, TokenKind::Bang),
                b'<' => self.either(b'=', TokenKind::LtEq, TokenKind::Lt),
                b'>' => self.either(b'=', TokenKind::GtEq, TokenKind::Gt),
                b'&' if self.match_byte(b'&') => self.make_token(TokenKind::AndAnd),
                b'|' if self.match_byte(b'|') => self.make_token(TokenKind::OrOr),
                b'"' => self.string(),
                b'0'..=b'9' => self.number(),
                b'a'..=b'z' | b'A'..=b'Z' => self.identifier(),
                _ => {
                    self.skip_rest_of_char();
                    self.error_token(UNEXPECTED_CHARACTER)
                }
            };
        }
    }

    fn either(&mut self, expected: u8, matched: TokenKind, otherwise: TokenKind) -> Token<'src> {
        if self.match_byte(expected) {
            self.make_token(matched)
        } else {
            self.make_token(otherwise)
        }
    }

    fn number(&mut self) -> Token<'src> {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.current += 1;
            while self.peek().is_ascii_digit() {
                self.current += 1;
            }
        }

        self.make_token(TokenKind::Number)
    }

    /// Strings may span lines; the token keeps the line of its opening quote.
    fn string(&mut self) -> Token<'src> {
        let start_line = self.line;
        while self.peek() != b'"' && self.peek() != b'\0' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.peek() == b'\0' {
            return Token {
                line: start_line,
                ..self.error_token(UNTERMINATED_STRING)
            };
        }

        self.current += 1;
        Token {
            line: start_line,
            ..self.make_token(TokenKind::String)
        }
    }

    fn identifier(&mut self) -> Token<'src> {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.current += 1;
        }

        let text = &self.source[self.start..self.current];
        let kind = KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == text)
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Identifier);

        self.make_token(kind)
    }

    /// Step over the continuation bytes of a multi-byte character.
    fn skip_rest_of_char(&mut self) {
        while !self.source.is_char_boundary(self.current) {
            self.current += 1;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.source[self.start..self.current],
            start: self.start,
            line: self.line,
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            start: self.start,
            line: self.line,
        }
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == b'\0' || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn advance(&mut self) -> u8 {
        let byte = self.peek();
        self.current += 1;
        byte
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        if self.peek() == b'\0' {
            return b'\0';
        }
        self.source
            .as_bytes()
            .get(self.current + 1)
            .copied()
            .unwrap_or(b'\0')
    }
}

/// Collect tokens up to and including the first end-of-input or error token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = tokenizer.next_token();
        let done = matches!(token.kind, TokenKind::Eof | TokenKind::Error);
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}
