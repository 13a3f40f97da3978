use crate::error::PipelineError;
use crate::operator::{Operator, Sink};
use crate::sentinel::Record;
use serde_json::Value;

/// Drops the trailing blank line left by splitting text on `\n`, or every
/// blank line when `ignore_all` is set.
///
/// A blank is held back until the next record shows it was not the last.
pub struct IgnoreBlankOp {
    ignore_all: bool,
    pending_blank: bool,
}

impl IgnoreBlankOp {
    pub fn new(ignore_all: bool) -> Self {
        log::debug!("ignore blanks (all: {})", ignore_all);
        IgnoreBlankOp {
            ignore_all,
            pending_blank: false,
        }
    }
}

fn is_blank(record: &Record) -> bool {
    matches!(record.value(), Some(Value::String(s)) if s.is_empty())
}

impl Operator for IgnoreBlankOp {
    fn name(&self) -> &'static str {
        "ignore-blank"
    }

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError> {
        if self.pending_blank {
            self.pending_blank = false;
            out.push(Record::text(""))?;
        }
        if !is_blank(&record) {
            out.push(record)
        } else {
            self.pending_blank = !self.ignore_all;
            Ok(())
        }
    }

    fn flush(&mut self, _out: &mut dyn Sink) -> Result<(), PipelineError> {
        if self.pending_blank {
            log::trace!("dropped trailing blank");
            self.pending_blank = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ignore_all: bool, input: &[&str]) -> Vec<Record> {
        let mut op = IgnoreBlankOp::new(ignore_all);
        let mut out = Vec::new();
        for s in input {
            op.transform(Record::text(*s), &mut out).unwrap();
        }
        op.flush(&mut out).unwrap();
        out
    }

    fn texts(items: &[&str]) -> Vec<Record> {
        items.iter().map(|s| Record::text(*s)).collect()
    }

    #[test]
    fn only_the_trailing_blank_is_dropped() {
        assert_eq!(run(false, &["a", "", "c", ""]), texts(&["a", "", "c"]));
        assert_eq!(run(false, &["", "", "b"]), texts(&["", "", "b"]));
        assert_eq!(run(false, &["a", "", ""]), texts(&["a", ""]));
    }

    #[test]
    fn every_blank_is_dropped_on_request() {
        assert_eq!(run(true, &["a", "", "c", ""]), texts(&["a", "c"]));
        assert_eq!(run(true, &["", ""]), texts(&[]));
    }
}
