//! Expression tree produced by the parser.

use crate::types::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `1`, `"a"`, `true`, `null`, `undefined`, `NaN`
    Literal(JsValue),
    /// A free identifier: `$`, `i`, `prev`
    Ident(String),
    /// `object.property`
    Member { object: Box<Expr>, property: String },
    /// `object[index]`
    Index { object: Box<Expr>, index: Box<Expr> },
    /// `callee(args...)`
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    /// Short-circuiting operators return one of their operands.
    Logical { op: LogicalOp, left: Box<Expr>, right: Box<Expr> },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Array(Vec<Expr>),
    /// Entries in source order.
    Object(Vec<(String, Expr)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,    // !
    Neg,    // -
    Plus,   // +
    Typeof, // typeof
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,         // +
    Sub,         // -
    Mul,         // *
    Div,         // /
    Rem,         // %
    Pow,         // **
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    Le,          // <=
    Gt,          // >
    Ge,          // >=
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,     // &&
    Or,      // ||
    Nullish, // ??
}
