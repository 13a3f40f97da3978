//! Expression engine for pjs snippets.
//!
//! Snippets are small JavaScript-flavoured expressions (`length > 3`,
//! `$.name.toUpperCase()`, `prev + curr`) evaluated once per record. They
//! are parsed by a recursive-descent [`Parser`] and run by a tree walker
//! over a fixed scope; there are no statements and no globals.
//!
//! In implicit mode the [`binder`] first rewrites bare string-member names
//! into accesses on `$`, so `trim()` means `$.trim()`.
//!
//! # Example
//!
//! ```
//! use pjs_expression::{BindingContext, CompiledExpression, JsValue, Snippet};
//!
//! let expr = CompiledExpression::compile(&Snippet::new("toUpperCase() + i")).unwrap();
//! let value = JsValue::from("foo");
//! let result = expr.evaluate(&BindingContext { value: &value, index: 2 }).unwrap();
//!
//! assert_eq!(result, JsValue::from("FOO2"));
//! ```

pub mod ast;
pub mod binder;
pub mod compile;
pub mod error;
pub mod eval_ctx;
pub mod evaluate;
pub mod lexer;
pub mod methods;
pub mod parser;
pub mod types;
pub mod util;
pub mod vars;

pub use binder::{bind, try_bind, STRING_MEMBERS};
pub use compile::{
    evaluate, evaluate_reducer, BindingContext, CompiledExpression, CompiledReducer, ReducerContext, Snippet,
    BINDING_NAME,
};
pub use error::{BindingError, EvalCause, EvaluationError, ExprError};
pub use eval_ctx::EvalCtx;
pub use parser::{ParseError, Parser};
pub use types::{JsValue, MethodDefinition, MethodMap};
pub use vars::Vars;
