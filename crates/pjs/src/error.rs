use pjs_expression::EvaluationError;
use thiserror::Error;

/// Boxed error raised by a record source.
pub type UpstreamError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop a pipeline. None of them is recovered from locally.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A snippet failed to compile or to evaluate.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A fold without a seed, `min` or `max` over zero records.
    #[error("{operation} of an empty sequence")]
    EmptySequence { operation: String },

    /// The record source signalled an error.
    #[error("upstream error: {0}")]
    Upstream(#[source] UpstreamError),

    /// The sink could not accept a record.
    #[error("sink error: {0}")]
    Sink(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid pipeline config: {0}")]
    Config(String),

    /// A record arrived after the pipeline had already failed or finished.
    #[error("pipeline is closed")]
    Closed,
}

impl PipelineError {
    pub fn empty_sequence(operation: impl Into<String>) -> Self {
        PipelineError::EmptySequence {
            operation: operation.into(),
        }
    }
}
