use crate::error::PipelineError;
use crate::operator::{Operator, Sink};
use crate::sentinel::{decode, Record};
use pjs_expression::util::format_number;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

const ARRAY_OPEN: &str = "[\n";
const ARRAY_SEPARATOR: &str = ",\n";
const ARRAY_CLOSE: &str = "\n]\n";

/// Renders each record as a compact JSON document, optionally framed as
/// one streamed array.
pub struct SerializeOp {
    array_mode: bool,
    started: bool,
}

impl SerializeOp {
    pub fn new(array_mode: bool) -> Self {
        log::debug!("serialize (array: {})", array_mode);
        SerializeOp {
            array_mode,
            started: false,
        }
    }
}

/// Compact formatter that prints floats the way `JSON.stringify` does:
/// `2` for `2.0`, `1e+300` for `1e300`.
struct JsNumberFormatter;

impl Formatter for JsNumberFormatter {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(format_number(value).as_bytes())
    }
}

/// Compact JSON text of a record; the sentinel is `null`.
pub fn to_document(record: Record) -> Result<String, PipelineError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, JsNumberFormatter);
    decode(record).serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

impl Operator for SerializeOp {
    fn name(&self) -> &'static str {
        "serialize"
    }

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError> {
        let doc = to_document(record)?;
        if !self.array_mode {
            return out.push(Record::text(doc));
        }
        let prefix = if self.started { ARRAY_SEPARATOR } else { ARRAY_OPEN };
        self.started = true;
        out.push(Record::text(format!("{}{}", prefix, doc)))
    }

    fn flush(&mut self, out: &mut dyn Sink) -> Result<(), PipelineError> {
        if !self.array_mode {
            return Ok(());
        }
        let close = if self.started {
            ARRAY_CLOSE.to_string()
        } else {
            format!("{}{}", ARRAY_OPEN, ARRAY_CLOSE)
        };
        self.started = false;
        out.push(Record::text(close))
    }
}
