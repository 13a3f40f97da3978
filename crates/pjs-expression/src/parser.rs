//! Recursive-descent parser for the snippet grammar.
//!
//! The grammar is the expression subset of JavaScript: literals, member and
//! index access, method calls, unary/binary/logical operators, the ternary,
//! and array/object literals. Statements, assignment, function literals and
//! `new` are rejected.

use crate::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use crate::lexer::{Lexer, Punct, Token, TokenKind};
use crate::types::JsValue;
use crate::util;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("Unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Invalid number at offset {offset}")]
    InvalidNumber { offset: usize },
    #[error("Invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("Unclosed string starting at offset {offset}")]
    UnclosedString { offset: usize },
    #[error("'{keyword}' is not supported in expressions (offset {offset})")]
    Unsupported { keyword: String, offset: usize },
    #[error("Expression nested too deeply at offset {offset} (limit {limit})")]
    TooDeep { offset: usize, limit: usize },
}

const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "function", "new", "var", "let", "const", "return", "this", "delete", "void", "class",
    "if", "for", "while", "do", "switch", "throw", "try", "import", "export", "yield", "await",
];

/// Deepest expression tree the parser builds. Evaluation recurses over the
/// same tree, so this also bounds the evaluator's stack.
pub const MAX_DEPTH: usize = 256;

/// Snippet parser.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Parse a complete snippet into a single expression.
    pub fn parse(source: &'a str) -> Result<Expr, ParseError> {
        let tokens = Lexer::tokenize(source)?;
        let mut parser = Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_expression()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(parser.unexpected(token)),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        let token = self.tokens.get(self.pos).cloned().ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn peek_punct(&self, punct: Punct) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    fn eat(&mut self, punct: Punct) -> bool {
        if self.peek_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: Punct) -> Result<(), ParseError> {
        let token = self.next()?;
        if token.is_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&token))
        }
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.source[token.start..token.end].to_string(),
            offset: token.start,
        }
    }

    /// Enters one more level of the tree; undone with [`Parser::leave`].
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let offset = self.peek().map_or(self.source.len(), |t| t.start);
            return Err(ParseError::TooDeep { offset, limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_nullish_or()?;
        if !self.eat(Punct::Question) {
            return Ok(test);
        }
        self.enter()?;
        let consequent = self.parse_expression()?;
        self.expect(Punct::Colon)?;
        let alternate = self.parse_expression()?;
        self.leave(1);
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_nullish_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        let mut levels = 0;
        loop {
            let op = if self.eat(Punct::OrOr) {
                LogicalOp::Or
            } else if self.eat(Punct::Nullish) {
                LogicalOp::Nullish
            } else {
                break;
            };
            self.enter()?;
            levels += 1;
            let right = self.parse_and()?;
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.leave(levels);
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        let mut levels = 0;
        while self.eat(Punct::AndAnd) {
            self.enter()?;
            levels += 1;
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.leave(levels);
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (Punct::EqEqEq, BinaryOp::StrictEq),
                (Punct::NotEqEq, BinaryOp::StrictNotEq),
                (Punct::EqEq, BinaryOp::Eq),
                (Punct::NotEq, BinaryOp::NotEq),
            ],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (Punct::Le, BinaryOp::Le),
                (Punct::Ge, BinaryOp::Ge),
                (Punct::Lt, BinaryOp::Lt),
                (Punct::Gt, BinaryOp::Gt),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[(Punct::Plus, BinaryOp::Add), (Punct::Minus, BinaryOp::Sub)],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                (Punct::Star, BinaryOp::Mul),
                (Punct::Slash, BinaryOp::Div),
                (Punct::Percent, BinaryOp::Rem),
            ],
            Self::parse_exponent,
        )
    }

    /// One left-associative precedence level.
    fn parse_binary_level(
        &mut self,
        ops: &[(Punct, BinaryOp)],
        next: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut left = next(self)?;
        let mut levels = 0;
        'outer: loop {
            for (punct, op) in ops {
                if self.eat(*punct) {
                    self.enter()?;
                    levels += 1;
                    let right = next(self)?;
                    left = Expr::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    };
                    continue 'outer;
                }
            }
            break;
        }
        self.leave(levels);
        Ok(left)
    }

    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;
        if self.eat(Punct::StarStar) {
            // Right-associative: 2 ** 3 ** 2 == 2 ** 9
            self.enter()?;
            let exponent = self.parse_exponent()?;
            self.leave(1);
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.parse_prefixed()?;
        self.leave(1);
        Ok(expr)
    }

    fn parse_prefixed(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Punct(Punct::Bang)) => Some(UnaryOp::Not),
            Some(TokenKind::Punct(Punct::Minus)) => Some(UnaryOp::Neg),
            Some(TokenKind::Punct(Punct::Plus)) => Some(UnaryOp::Plus),
            Some(TokenKind::Ident(name)) if name == "typeof" => Some(UnaryOp::Typeof),
            _ => None,
        };
        match op {
            Some(op) => {
                self.pos += 1;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            None => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut levels = 0;
        loop {
            if self.peek_punct(Punct::Dot) || self.peek_punct(Punct::LBracket) || self.peek_punct(Punct::LParen) {
                self.enter()?;
                levels += 1;
            }
            if self.eat(Punct::Dot) {
                let token = self.next()?;
                let property = match token.ident() {
                    Some(name) => name.to_string(),
                    None => return Err(self.unexpected(&token)),
                };
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                };
            } else if self.eat(Punct::LBracket) {
                let index = self.parse_expression()?;
                self.expect(Punct::RBracket)?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.eat(Punct::LParen) {
                let args = self.parse_list(Punct::RParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                };
            } else {
                break;
            }
        }
        self.leave(levels);
        Ok(expr)
    }

    /// Comma-separated expressions up to `close`; a trailing comma is allowed.
    fn parse_list(&mut self, close: Punct) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_expression()?);
            if !self.eat(Punct::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(util::number_to_jsval(*n))),
            TokenKind::Str(s) => Ok(Expr::Literal(JsValue::from(s.as_str()))),
            TokenKind::Ident(name) => self.parse_identifier(name, &token),
            TokenKind::Punct(Punct::LParen) => {
                let expr = self.parse_expression()?;
                self.expect(Punct::RParen)?;
                Ok(expr)
            }
            TokenKind::Punct(Punct::LBracket) => Ok(Expr::Array(self.parse_list(Punct::RBracket)?)),
            TokenKind::Punct(Punct::LBrace) => self.parse_object(),
            TokenKind::Punct(_) => Err(self.unexpected(&token)),
        }
    }

    fn parse_identifier(&self, name: &str, token: &Token) -> Result<Expr, ParseError> {
        let literal = match name {
            "true" => JsValue::from(true),
            "false" => JsValue::from(false),
            "null" => JsValue::Json(serde_json::Value::Null),
            "undefined" => JsValue::Undefined,
            "NaN" => JsValue::NonFinite(f64::NAN),
            "Infinity" => JsValue::NonFinite(f64::INFINITY),
            _ if UNSUPPORTED_KEYWORDS.contains(&name) => {
                return Err(ParseError::Unsupported {
                    keyword: name.to_string(),
                    offset: token.start,
                })
            }
            _ => return Ok(Expr::Ident(name.to_string())),
        };
        Ok(Expr::Literal(literal))
    }

    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        loop {
            if self.eat(Punct::RBrace) {
                return Ok(Expr::Object(entries));
            }
            let token = self.next()?;
            let key = match &token.kind {
                TokenKind::Ident(name) => name.clone(),
                TokenKind::Str(s) => s.clone(),
                TokenKind::Number(n) => util::format_number(*n),
                TokenKind::Punct(_) => return Err(self.unexpected(&token)),
            };
            let shorthand = token.ident().is_some()
                && (self.peek_punct(Punct::Comma) || self.peek_punct(Punct::RBrace));
            let value = if shorthand {
                self.parse_identifier(&key, &token)?
            } else {
                self.expect(Punct::Colon)?;
                self.parse_expression()?
            };
            entries.push((key, value));
            if !self.eat(Punct::Comma) {
                self.expect(Punct::RBrace)?;
                return Ok(Expr::Object(entries));
            }
        }
    }
}
