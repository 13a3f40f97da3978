//! Push-transform seams: [`Operator`] stages and the [`Sink`] they write to.

use crate::error::PipelineError;
use crate::sentinel::{decode, Record};
use serde_json::Value;
use std::io::Write;

/// Consumer of records, accepting each before the next is delivered.
pub trait Sink {
    fn push(&mut self, record: Record) -> Result<(), PipelineError>;
}

impl Sink for Vec<Record> {
    fn push(&mut self, record: Record) -> Result<(), PipelineError> {
        Vec::push(self, record);
        Ok(())
    }
}

/// A single-input pipeline stage.
///
/// `transform` is called once per upstream record and may push zero or one
/// records (reduce pushes none). `flush` is the end-of-input signal; a
/// stage that buffers emits its result there.
pub trait Operator {
    /// Short stage name, for logs.
    fn name(&self) -> &'static str;

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError>;

    fn flush(&mut self, _out: &mut dyn Sink) -> Result<(), PipelineError> {
        Ok(())
    }
}

impl<T: Operator + ?Sized> Operator for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError> {
        (**self).transform(record, out)
    }

    fn flush(&mut self, out: &mut dyn Sink) -> Result<(), PipelineError> {
        (**self).flush(out)
    }
}

/// Writes records to a byte stream: strings verbatim, anything else as a
/// compact JSON document. The sentinel is written as `null`.
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn push(&mut self, record: Record) -> Result<(), PipelineError> {
        match decode(record) {
            Value::String(s) => self.writer.write_all(s.as_bytes())?,
            other => serde_json::to_writer(&mut self.writer, &other)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_sink_renders_text_and_documents() {
        let mut sink = WriteSink::new(Vec::new());
        sink.push(Record::text("a\n")).unwrap();
        sink.push(Record::Null).unwrap();
        sink.push(Record::Value(json!({"k": [1]}))).unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "a\nnull{\"k\":[1]}");
    }
}
