//! Tokenizer shared by the parser and the implicit binder.

use crate::parser::ParseError;
use crate::util::{is_ident_part, is_ident_start};

/// Punctuators of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]
    LBrace,     // {
    RBrace,     // }
    Comma,      // ,
    Dot,        // .
    Colon,      // :
    Question,   // ?
    Nullish,    // ??
    Plus,       // +
    Minus,      // -
    Star,       // *
    StarStar,   // **
    Slash,      // /
    Percent,    // %
    Bang,       // !
    Lt,         // <
    Le,         // <=
    Gt,         // >
    Ge,         // >=
    EqEq,       // ==
    EqEqEq,     // ===
    NotEq,      // !=
    NotEqEq,    // !==
    AndAnd,     // &&
    OrOr,       // ||
}

impl Punct {
    pub fn as_str(self) -> &'static str {
        match self {
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Dot => ".",
            Punct::Colon => ":",
            Punct::Question => "?",
            Punct::Nullish => "??",
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::StarStar => "**",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Bang => "!",
            Punct::Lt => "<",
            Punct::Le => "<=",
            Punct::Gt => ">",
            Punct::Ge => ">=",
            Punct::EqEq => "==",
            Punct::EqEqEq => "===",
            Punct::NotEq => "!=",
            Punct::NotEqEq => "!==",
            Punct::AndAnd => "&&",
            Punct::OrOr => "||",
        }
    }
}

// Longest first, so `===` wins over `==` and `=`.
const PUNCTUATORS: &[Punct] = &[
    Punct::EqEqEq,
    Punct::NotEqEq,
    Punct::StarStar,
    Punct::Nullish,
    Punct::Le,
    Punct::Ge,
    Punct::EqEq,
    Punct::NotEq,
    Punct::AndAnd,
    Punct::OrOr,
    Punct::LParen,
    Punct::RParen,
    Punct::LBracket,
    Punct::RBracket,
    Punct::LBrace,
    Punct::RBrace,
    Punct::Comma,
    Punct::Dot,
    Punct::Colon,
    Punct::Question,
    Punct::Plus,
    Punct::Minus,
    Punct::Star,
    Punct::Slash,
    Punct::Percent,
    Punct::Bang,
    Punct::Lt,
    Punct::Gt,
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Punct(Punct),
}

/// A token and the byte range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Splits `input` into tokens.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Self { input, pos: 0 };
        let mut tokens = Vec::new();
        loop {
            lexer.skip_whitespace();
            let start = lexer.pos;
            let kind = match lexer.peek() {
                None => break,
                Some(c) if is_ident_start(c) => TokenKind::Ident(lexer.read_identifier()),
                Some(c) if c.is_ascii_digit() => TokenKind::Number(lexer.read_number()?),
                Some('.') if lexer.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    TokenKind::Number(lexer.read_number()?)
                }
                Some(q) if q == '"' || q == '\'' => TokenKind::Str(lexer.read_string()?),
                Some(c) => TokenKind::Punct(lexer.read_punct(c)?),
            };
            tokens.push(Token {
                kind,
                start,
                end: lexer.pos,
            });
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_part(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;

        if self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            let radix = match self.peek_at(1) {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            self.advance();
            self.advance();
            let digits_start = self.pos;
            while let Some(c) = self.peek() {
                if c.is_digit(radix) {
                    self.advance();
                } else {
                    break;
                }
            }
            return u64::from_str_radix(&self.input[digits_start..self.pos], radix)
                .map(|n| n as f64)
                .map_err(|_| ParseError::InvalidNumber { offset: start });
        }

        self.skip_digits();
        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            self.skip_digits();
        }
        if self.peek().is_some_and(is_ident_start) {
            return Err(ParseError::InvalidNumber { offset: start });
        }

        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber { offset: start })
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let Some(quote) = self.peek() else {
            return Err(ParseError::UnexpectedEnd);
        };
        self.advance();

        let mut result = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(ParseError::UnclosedString { offset: start }),
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_at = self.pos;
                    self.advance();
                    let Some(c) = self.peek() else {
                        return Err(ParseError::UnclosedString { offset: start });
                    };
                    self.advance();
                    match c {
                        'n' => result.push('\n'),
                        't' => result.push('\t'),
                        'r' => result.push('\r'),
                        'b' => result.push('\u{8}'),
                        'f' => result.push('\u{c}'),
                        'v' => result.push('\u{b}'),
                        '0' => result.push('\0'),
                        'u' => result.push(self.read_unicode_escape(escape_at)?),
                        // Any other escaped character stands for itself.
                        other => result.push(other),
                    }
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }

        Ok(result)
    }

    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char, ParseError> {
        let invalid = ParseError::InvalidEscape { offset: escape_at };
        let digits = if self.peek() == Some('{') {
            self.advance();
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            let digits = &self.input[start..self.pos];
            if self.peek() != Some('}') {
                return Err(invalid);
            }
            self.advance();
            digits
        } else {
            let start = self.pos;
            for _ in 0..4 {
                if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid);
                }
                self.advance();
            }
            &self.input[start..self.pos]
        };
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or(invalid)
    }

    fn read_punct(&mut self, c: char) -> Result<Punct, ParseError> {
        let rest = &self.input[self.pos..];
        for punct in PUNCTUATORS {
            if rest.starts_with(punct.as_str()) {
                self.pos += punct.as_str().len();
                return Ok(*punct);
            }
        }
        Err(ParseError::UnexpectedChar {
            ch: c,
            offset: self.pos,
        })
    }
}
