//! Snippet compilation.
//!
//! A snippet is bound (in implicit mode) and parsed once; the resulting
//! tree is evaluated per record against a fresh [`Vars`] scope.

use crate::ast::Expr;
use crate::binder;
use crate::error::{EvalCause, EvaluationError};
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval_expr;
use crate::methods::{shared_method_tables, MethodTables};
use crate::parser::Parser;
use crate::types::JsValue;
use crate::vars::Vars;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reserved name of the current value.
pub const BINDING_NAME: &str = "$";

/// Caller-supplied expression code and how to apply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snippet {
    pub code: String,
    /// The current value is only reachable as `$`; no implicit binding.
    pub explicit_binding: bool,
    /// Results are coerced to text with a trailing line terminator.
    pub output_as_text: bool,
}

impl Snippet {
    pub fn new(code: impl Into<String>) -> Self {
        Snippet {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_explicit_binding(mut self, explicit: bool) -> Self {
        self.explicit_binding = explicit;
        self
    }

    pub fn with_output_as_text(mut self, text: bool) -> Self {
        self.output_as_text = text;
        self
    }
}

/// Scope of a per-record evaluation.
#[derive(Debug, Clone, Copy)]
pub struct BindingContext<'a> {
    pub value: &'a JsValue,
    pub index: usize,
}

/// Scope of one fold step.
#[derive(Debug, Clone, Copy)]
pub struct ReducerContext<'a> {
    /// The running accumulator.
    pub previous: &'a JsValue,
    /// The element being folded in.
    pub current: &'a JsValue,
    pub index: usize,
    /// The whole backing sequence, as an array.
    pub sequence: &'a JsValue,
}

fn parse(code: &str, source: &str) -> Result<Expr, EvaluationError> {
    Parser::parse(source).map_err(|e| EvaluationError::new(code, "compile", e))
}

/// A per-record snippet, ready to evaluate.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    snippet: Snippet,
    expr: Expr,
    methods: Arc<MethodTables>,
}

impl CompiledExpression {
    pub fn compile(snippet: &Snippet) -> Result<Self, EvaluationError> {
        let source = if snippet.explicit_binding {
            snippet.code.clone()
        } else {
            binder::try_bind(&snippet.code, BINDING_NAME)
                .map_err(|e| EvaluationError::new(&snippet.code, "compile", EvalCause::Binding(e)))?
        };
        log::trace!("compiled `{}` as `{}`", snippet.code, source);
        Ok(CompiledExpression {
            snippet: snippet.clone(),
            expr: parse(&snippet.code, &source)?,
            methods: shared_method_tables(),
        })
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    /// Evaluates against one record. Exposes `$`, `i` and `index`; in
    /// implicit mode an object record's own properties are in scope too.
    pub fn evaluate(&self, ctx: &BindingContext<'_>) -> Result<JsValue, EvaluationError> {
        let index = JsValue::from(ctx.index);
        let mut vars = if self.snippet.explicit_binding {
            Vars::new()
        } else {
            Vars::with_env(ctx.value)
        };
        vars.set(BINDING_NAME, ctx.value);
        vars.set("i", &index);
        vars.set("index", &index);
        let eval_ctx = EvalCtx::new(&vars, Arc::clone(&self.methods));
        eval_expr(&self.expr, &eval_ctx)
            .map_err(|e| EvaluationError::new(&self.snippet.code, vars.describe(), e))
    }
}

/// A two-argument fold step such as `prev + curr`.
#[derive(Debug, Clone)]
pub struct CompiledReducer {
    code: String,
    expr: Expr,
    methods: Arc<MethodTables>,
}

impl CompiledReducer {
    pub fn compile(code: &str) -> Result<Self, EvaluationError> {
        Ok(CompiledReducer {
            code: code.to_string(),
            expr: parse(code, code)?,
            methods: shared_method_tables(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Evaluates one step. Exposes `prev`/`previous`, `curr`/`current`,
    /// `i`/`index` and `array`/`sequence`.
    pub fn evaluate(&self, ctx: &ReducerContext<'_>) -> Result<JsValue, EvaluationError> {
        let index = JsValue::from(ctx.index);
        let mut vars = Vars::new();
        for (short, long, value) in [
            ("prev", "previous", ctx.previous),
            ("curr", "current", ctx.current),
            ("i", "index", &index),
            ("array", "sequence", ctx.sequence),
        ] {
            vars.set(short, value);
            vars.set(long, value);
        }
        let eval_ctx = EvalCtx::new(&vars, Arc::clone(&self.methods));
        eval_expr(&self.expr, &eval_ctx).map_err(|e| EvaluationError::new(&self.code, vars.describe(), e))
    }
}

/// Compiles and evaluates `snippet` once.
pub fn evaluate(snippet: &Snippet, ctx: &BindingContext<'_>) -> Result<JsValue, EvaluationError> {
    CompiledExpression::compile(snippet)?.evaluate(ctx)
}

/// Compiles and evaluates one fold step of `code`.
pub fn evaluate_reducer(code: &str, ctx: &ReducerContext<'_>) -> Result<JsValue, EvaluationError> {
    CompiledReducer::compile(code)?.evaluate(ctx)
}
