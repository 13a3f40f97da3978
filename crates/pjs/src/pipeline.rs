//! Synchronous driver chaining operators into one push pipeline.

use crate::error::{PipelineError, UpstreamError};
use crate::operator::{Operator, Sink};
use crate::sentinel::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Failed,
    Finished,
}

/// Stages run in insertion order. Each record is pushed through every stage
/// before the next is accepted; the first error closes the pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn Operator>>,
    state: State,
}

/// Sink that feeds the remaining stages, then the final sink.
struct Downstream<'a> {
    stages: &'a mut [Box<dyn Operator>],
    sink: &'a mut dyn Sink,
}

impl Sink for Downstream<'_> {
    fn push(&mut self, record: Record) -> Result<(), PipelineError> {
        feed(self.stages, record, self.sink)
    }
}

fn feed(stages: &mut [Box<dyn Operator>], record: Record, sink: &mut dyn Sink) -> Result<(), PipelineError> {
    match stages.split_first_mut() {
        None => sink.push(record),
        Some((stage, rest)) => stage.transform(record, &mut Downstream { stages: rest, sink }),
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            stages: Vec::new(),
            state: State::Open,
        }
    }

    pub fn with_stage(mut self, stage: impl Operator + 'static) -> Self {
        self.add_stage(Box::new(stage));
        self
    }

    pub fn add_stage(&mut self, stage: Box<dyn Operator>) {
        self.stages.push(stage);
    }

    /// Stage names in order, e.g. `["ignore-blank", "map"]`.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    fn check_open(&self) -> Result<(), PipelineError> {
        match self.state {
            State::Open => Ok(()),
            State::Failed | State::Finished => Err(PipelineError::Closed),
        }
    }

    fn close_on_error<T>(&mut self, result: Result<T, PipelineError>) -> Result<T, PipelineError> {
        if let Err(err) = &result {
            log::debug!("pipeline failed: {}", err);
            self.state = State::Failed;
        }
        result
    }

    /// Pushes one upstream record through every stage.
    pub fn push(&mut self, record: Record, sink: &mut dyn Sink) -> Result<(), PipelineError> {
        self.check_open()?;
        let result = feed(&mut self.stages, record, sink);
        self.close_on_error(result)
    }

    /// Signals end of input: flushes each stage in order, so whatever an
    /// earlier stage emits on flush still passes through the later ones.
    pub fn finish(&mut self, sink: &mut dyn Sink) -> Result<(), PipelineError> {
        self.check_open()?;
        let mut result = Ok(());
        for k in 0..self.stages.len() {
            let (head, rest) = self.stages.split_at_mut(k + 1);
            result = head[k].flush(&mut Downstream { stages: rest, sink: &mut *sink });
            if result.is_err() {
                break;
            }
        }
        let result = self.close_on_error(result);
        if result.is_ok() {
            self.state = State::Finished;
        }
        result
    }

    /// Drains `source` into the pipeline, then finishes it. An upstream
    /// `Err` stops the run as [`PipelineError::Upstream`].
    pub fn run<I, E>(&mut self, source: I, sink: &mut dyn Sink) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = Result<Record, E>>,
        E: Into<UpstreamError>,
    {
        for item in source {
            let record = match item {
                Ok(record) => record,
                Err(err) => {
                    let err = PipelineError::Upstream(err.into());
                    return self.close_on_error(Err(err));
                }
            };
            self.push(record, sink)?;
        }
        self.finish(sink)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
