use crate::parser::ParseError;
use thiserror::Error;

/// Runtime failures raised while walking an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("{0} is not defined")]
    UndefinedReference(String),

    #[error("{0} is not a function")]
    NotAFunction(String),

    #[error("Cannot read properties of {base} (reading '{property}')")]
    NullProperty { base: &'static str, property: String },

    #[error("method '{0}' must be called")]
    UncalledMethod(String),

    #[error("Invalid regular expression: {0}")]
    InvalidRegex(String),

    #[error("{0}")]
    InvalidArgument(String),
}

/// The binder could not tokenize a snippet.
///
/// Binding is purely lexical, so the only way it fails is a snippet the
/// lexer rejects (an unterminated string literal, a stray character).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot bind snippet: {0}")]
pub struct BindingError(#[from] pub ParseError);

/// Underlying cause of an [`EvaluationError`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalCause {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Runtime(#[from] ExprError),
}

/// A snippet failed to compile or to evaluate against a record.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to evaluate `{snippet}` ({context}): {cause}")]
pub struct EvaluationError {
    /// The snippet as the caller wrote it.
    pub snippet: String,
    /// Rendering of the binding context the failure happened in.
    pub context: String,
    #[source]
    pub cause: EvalCause,
}

impl EvaluationError {
    pub fn new(snippet: impl Into<String>, context: impl Into<String>, cause: impl Into<EvalCause>) -> Self {
        EvaluationError {
            snippet: snippet.into(),
            context: context.into(),
            cause: cause.into(),
        }
    }
}
